//! Configuration structures for the control unit.
//!
//! All config types use `serde::Deserialize` for TOML loading.
//! Numeric parameters are range-checked by [`Validate`].
//! Every section and field has a default so a partial file still loads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig, Validate};
use crate::consts::{TICK_RATE_HZ, TICK_RATE_HZ_MAX, TICK_RATE_HZ_MIN};
use crate::hal::driver::ClosedLoopGains;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level robot configuration.
///
/// Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default)]
    pub shared: SharedConfig,

    /// Periodic tick rate [Hz] (default: 50).
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    #[serde(default)]
    pub lift: LiftConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default)]
    pub intake: IntakeConfig,

    #[serde(default)]
    pub auto: AutoConfig,

    #[serde(default)]
    pub controls: ControlsConfig,
}

fn default_tick_rate_hz() -> u32 {
    TICK_RATE_HZ
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            shared: SharedConfig::default(),
            tick_rate_hz: TICK_RATE_HZ,
            lift: LiftConfig::default(),
            drive: DriveConfig::default(),
            intake: IntakeConfig::default(),
            auto: AutoConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Tick period [s].
    #[inline]
    pub fn tick_period_s(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz)
    }
}

impl Validate for RobotConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        if self.tick_rate_hz < TICK_RATE_HZ_MIN || self.tick_rate_hz > TICK_RATE_HZ_MAX {
            return Err(ConfigError::ValidationError(format!(
                "tick_rate_hz {} out of range [{}, {}]",
                self.tick_rate_hz, TICK_RATE_HZ_MIN, TICK_RATE_HZ_MAX
            )));
        }
        self.lift.validate()?;
        self.drive.validate()?;
        self.intake.validate()?;
        Ok(())
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

fn require_unit_range(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{name} {value} out of range [0, 1]"
        )))
    }
}

// ─── Lift ───────────────────────────────────────────────────────────

/// Lift height controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftConfig {
    /// Full travel in raw encoder ticks; also the forward soft limit.
    pub max_height_ticks: f64,
    /// Full travel in inches.
    pub max_height_inches: f64,
    /// Position loop gains loaded into the motor controller.
    pub gains: ClosedLoopGains,
    /// Voltage compensation saturation [V].
    pub voltage_saturation: f64,
    /// Scale applied to manual percent output.
    pub manual_output_scale: f64,
    /// On-target band for `LiftToHeight` [in].
    pub tolerance_inches: f64,
    /// Consecutive on-target ticks before `LiftToHeight` finishes.
    pub settle_ticks: u32,
    /// Power monitor channels feeding the lead and follower motors.
    pub power_channels: [u8; 2],
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            max_height_ticks: 60_000.0,
            max_height_inches: 79.0,
            gains: ClosedLoopGains {
                kp: 0.15,
                ki: 0.0001,
                kd: 2.5,
                kf: 0.0,
            },
            voltage_saturation: 10.0,
            manual_output_scale: 1.0,
            tolerance_inches: 1.0,
            settle_ticks: 5,
            power_channels: [3, 12],
        }
    }
}

impl Validate for LiftConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("lift.max_height_ticks", self.max_height_ticks)?;
        require_positive("lift.max_height_inches", self.max_height_inches)?;
        require_positive("lift.voltage_saturation", self.voltage_saturation)?;
        require_positive("lift.tolerance_inches", self.tolerance_inches)?;
        require_unit_range("lift.manual_output_scale", self.manual_output_scale)?;
        Ok(())
    }
}

// ─── Drive ──────────────────────────────────────────────────────────

/// Proportional/integral/derivative constants for command-side loops.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidConstants {
    pub kp: f64,
    #[serde(default)]
    pub ki: f64,
    #[serde(default)]
    pub kd: f64,
}

/// Drivetrain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Encoder ticks per inch of travel.
    pub ticks_per_inch: f64,
    /// Wheel track width [in] (simulation only).
    pub track_width_inches: f64,
    /// Distance loop (output per inch of error).
    pub distance: PidConstants,
    /// Turn loop (output per degree of error).
    pub turn: PidConstants,
    /// Heading-hold gain while driving straight (output per degree).
    pub heading_kp: f64,
    /// Output clamp for autonomous drive commands.
    pub max_output: f64,
    pub distance_tolerance_inches: f64,
    pub angle_tolerance_degrees: f64,
    /// Consecutive on-target ticks before a drive primitive finishes.
    pub settle_ticks: u32,
    /// Joystick deadband applied by teleop commands.
    pub deadband: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            ticks_per_inch: 217.3,
            track_width_inches: 25.0,
            distance: PidConstants {
                kp: 0.05,
                ki: 0.0,
                kd: 0.002,
            },
            turn: PidConstants {
                kp: 0.02,
                ki: 0.0,
                kd: 0.0005,
            },
            heading_kp: 0.01,
            max_output: 0.8,
            distance_tolerance_inches: 1.0,
            angle_tolerance_degrees: 2.0,
            settle_ticks: 10,
            deadband: 0.05,
        }
    }
}

impl Validate for DriveConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("drive.ticks_per_inch", self.ticks_per_inch)?;
        require_positive("drive.track_width_inches", self.track_width_inches)?;
        require_positive("drive.distance_tolerance_inches", self.distance_tolerance_inches)?;
        require_positive("drive.angle_tolerance_degrees", self.angle_tolerance_degrees)?;
        require_unit_range("drive.max_output", self.max_output)?;
        if !(0.0..0.5).contains(&self.deadband) {
            return Err(ConfigError::ValidationError(format!(
                "drive.deadband {} out of range [0, 0.5)",
                self.deadband
            )));
        }
        Ok(())
    }
}

// ─── Intake ─────────────────────────────────────────────────────────

/// Intake configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Percent output used to eject a cube.
    pub eject_speed: f64,
    /// Percent output used to pull a cube in.
    pub intake_speed: f64,
    /// Duration of an eject [ticks].
    pub eject_ticks: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            eject_speed: 0.8,
            intake_speed: -0.6,
            eject_ticks: 25,
        }
    }
}

impl Validate for IntakeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.eject_speed.abs() > 1.0 || self.intake_speed.abs() > 1.0 {
            return Err(ConfigError::ValidationError(
                "intake speeds must lie in [-1, 1]".to_string(),
            ));
        }
        if self.eject_ticks == 0 {
            return Err(ConfigError::ValidationError(
                "intake.eject_ticks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Autonomous ─────────────────────────────────────────────────────

/// Selectable autonomous routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoRoutine {
    /// Do nothing.
    None,
    /// Drive straight from the back wall to the switch.
    #[default]
    DriveToSwitch,
    /// Cross the platform zone, approach the scale, raise the lift and eject.
    LeftUnownedScale,
    /// Like `LeftUnownedScale` but raises the lift while driving the last leg.
    ScaleWithParallelLift,
}

impl AutoRoutine {
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::DriveToSwitch,
        Self::LeftUnownedScale,
        Self::ScaleWithParallelLift,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DriveToSwitch => "drive_to_switch",
            Self::LeftUnownedScale => "left_unowned_scale",
            Self::ScaleWithParallelLift => "scale_with_parallel_lift",
        }
    }
}

impl fmt::Display for AutoRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoRoutine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ConfigError::ValidationError(format!("unknown auto routine '{s}'")))
    }
}

/// Field measurements and routine selection for autonomous play.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoConfig {
    pub routine: AutoRoutine,
    pub back_wall_to_switch: f64,
    pub back_wall_to_platform_zone: f64,
    pub through_platform_zone: f64,
    pub platform_to_scale: f64,
    /// Relative turn into the platform zone [deg], positive clockwise.
    pub long_right_turn: f64,
    /// Relative turn toward the scale [deg].
    pub long_left_turn: f64,
    pub switch_height: f64,
    pub scale_height: f64,
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            routine: AutoRoutine::DriveToSwitch,
            back_wall_to_switch: 140.0,
            back_wall_to_platform_zone: 220.0,
            through_platform_zone: 190.0,
            platform_to_scale: 50.0,
            long_right_turn: 90.0,
            long_left_turn: -90.0,
            switch_height: 30.0,
            scale_height: 72.0,
        }
    }
}

// ─── Operator Controls ──────────────────────────────────────────────

/// Operator console axis and button assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub forward_axis: u8,
    pub turn_axis: u8,
    pub quick_turn_left_button: u8,
    pub quick_turn_right_button: u8,
    pub lift_axis: u8,
    pub lift_floor_button: u8,
    pub lift_switch_button: u8,
    pub lift_scale_button: u8,
    pub eject_button: u8,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            forward_axis: 1,
            turn_axis: 4,
            quick_turn_left_button: 5,
            quick_turn_right_button: 6,
            lift_axis: 5,
            lift_floor_button: 1,
            lift_switch_button: 2,
            lift_scale_button: 4,
            eject_button: 3,
        }
    }
}
