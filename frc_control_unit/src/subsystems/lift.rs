//! Lift height controller.
//!
//! Lead/follower motor pair with an encoder on the lead. Two modes:
//!
//! - **ClosedLoop**: every periodic step pushes the desired height into a
//!   moving-average window and commands the on-device position loop to the
//!   window mean, so setpoint jumps become a ramp.
//! - **Manual**: percent output straight from the caller. The window is
//!   overwritten with the measured height every step so that switching back
//!   to ClosedLoop starts from where the lift actually is.
//!
//! The encoder is zeroed on the first periodic step, before any closed-loop
//! output is computed. The forward soft limit is programmed into the lead
//! controller at construction and enforced there.

use frc_common::consts::LIFT_FILTER_LEN;
use frc_common::control_unit::config::LiftConfig;
use frc_common::control_unit::error::{LiftFault, finite_or};
use frc_common::hal::driver::{HalError, MotorController, PowerMonitor, Telemetry};
use tracing::{info, warn};

use crate::control::filters::MovingAverage;
use crate::subsystem::{Subsystem, SubsystemId};

/// Linear inch ↔ tick conversion over the full travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftUnits {
    max_ticks: f64,
    max_inches: f64,
}

impl LiftUnits {
    /// Both spans must be positive and finite; `LiftConfig::validate` checks this.
    pub const fn new(max_ticks: f64, max_inches: f64) -> Self {
        Self {
            max_ticks,
            max_inches,
        }
    }

    #[inline]
    pub fn inches_to_ticks(&self, inches: f64) -> f64 {
        inches * self.max_ticks / self.max_inches
    }

    #[inline]
    pub fn ticks_to_inches(&self, ticks: f64) -> f64 {
        ticks * self.max_inches / self.max_ticks
    }

    #[inline]
    pub const fn max_inches(&self) -> f64 {
        self.max_inches
    }

    #[inline]
    pub const fn max_ticks(&self) -> f64 {
        self.max_ticks
    }
}

/// Lift control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiftMode {
    #[default]
    Manual,
    ClosedLoop,
}

/// Lift subsystem.
pub struct Lift {
    id: SubsystemId,
    lead: Box<dyn MotorController>,
    follower: Box<dyn MotorController>,
    power: Box<dyn PowerMonitor>,
    units: LiftUnits,
    power_channels: [u8; 2],
    manual_output_scale: f64,
    mode: LiftMode,
    /// Desired height [in].
    desired: f64,
    /// Window mean commanded on the last closed-loop step [in].
    commanded: f64,
    filter: MovingAverage<LIFT_FILTER_LEN>,
    zeroed: bool,
    faults: LiftFault,
}

impl Lift {
    /// Configure the controllers and build the lift. Starts in Manual mode
    /// with zero output.
    pub fn new(
        id: SubsystemId,
        mut lead: Box<dyn MotorController>,
        follower: Box<dyn MotorController>,
        power: Box<dyn PowerMonitor>,
        config: &LiftConfig,
    ) -> Result<Self, HalError> {
        lead.configure_voltage_compensation(Some(config.voltage_saturation))?;
        lead.configure_soft_limit(config.max_height_ticks)?;
        lead.configure_closed_loop_gains(config.gains)?;

        let mut lift = Self {
            id,
            lead,
            follower,
            power,
            units: LiftUnits::new(config.max_height_ticks, config.max_height_inches),
            power_channels: config.power_channels,
            manual_output_scale: config.manual_output_scale,
            mode: LiftMode::Manual,
            desired: 0.0,
            commanded: 0.0,
            filter: MovingAverage::new(),
            zeroed: false,
            faults: LiftFault::empty(),
        };
        lift.set_manual_output(0.0);
        Ok(lift)
    }

    /// Switch to ClosedLoop and record a new desired height [in].
    ///
    /// Takes effect on the next periodic step. Out-of-range heights are
    /// clamped to the travel; non-finite heights are ignored.
    pub fn set_target_height(&mut self, inches: f64) {
        if !inches.is_finite() {
            warn!(setpoint = inches, "lift setpoint ignored: not finite");
            self.faults |= LiftFault::SETPOINT_INVALID;
            return;
        }
        let clamped = inches.clamp(0.0, self.units.max_inches());
        if clamped != inches {
            warn!(
                setpoint = inches,
                clamped, "lift setpoint clamped to travel range"
            );
            self.faults |= LiftFault::SETPOINT_CLAMPED;
        }
        self.desired = clamped;
        self.mode = LiftMode::ClosedLoop;
    }

    /// Switch to Manual and drive the lift open-loop.
    ///
    /// `percent` is clamped to `[-1, 1]` and scaled by the configured manual
    /// output scale. Non-finite input stops the motor.
    pub fn set_manual_output(&mut self, percent: f64) {
        self.mode = LiftMode::Manual;
        let output = finite_or(percent, 0.0).clamp(-1.0, 1.0) * self.manual_output_scale;
        self.lead.command_percent_output(output);
        self.follower.command_percent_output(-output);
    }

    /// Hold the current measured height in ClosedLoop.
    pub fn hold_position(&mut self) {
        let height = self.height();
        self.filter.fill(height);
        self.set_target_height(height);
    }

    /// Measured height [in].
    #[inline]
    pub fn height(&self) -> f64 {
        self.units.ticks_to_inches(self.lead.read_position())
    }

    #[inline]
    pub fn desired_height(&self) -> f64 {
        self.desired
    }

    /// Window mean sent to the position loop on the last step [in].
    #[inline]
    pub fn commanded_height(&self) -> f64 {
        self.commanded
    }

    #[inline]
    pub fn mode(&self) -> LiftMode {
        self.mode
    }

    #[inline]
    pub fn is_zeroed(&self) -> bool {
        self.zeroed
    }

    #[inline]
    pub fn units(&self) -> LiftUnits {
        self.units
    }

    #[inline]
    pub fn faults(&self) -> LiftFault {
        self.faults
    }

    /// Estimated motor output current for one side [A].
    ///
    /// `input * bus / output`; falls back to the input current when the
    /// ratio is not finite (zero output voltage).
    fn output_current(&mut self, input_current: f64, output_voltage: f64) -> f64 {
        let estimate = input_current * self.power.bus_voltage() / output_voltage;
        if !estimate.is_finite() {
            self.faults |= LiftFault::TELEMETRY_FALLBACK;
        }
        finite_or(estimate, input_current)
    }

    fn step_closed_loop(&mut self) {
        self.filter.insert(self.desired);
        let mean = self.filter.mean();
        match self.mode {
            LiftMode::ClosedLoop => {
                self.commanded = mean;
                self.lead
                    .command_closed_loop_position(self.units.inches_to_ticks(mean));
            }
            LiftMode::Manual => {
                let height = self.height();
                self.desired = height;
                self.commanded = height;
                self.filter.fill(height);
            }
        }
        // Follower mirrors the lead, inverted.
        let lead_output = self.lead.read_percent_output();
        self.follower.command_percent_output(-lead_output);
    }

    fn publish(&mut self, telemetry: &mut dyn Telemetry) {
        let [lead_channel, follower_channel] = self.power_channels;
        let lead_in = self.power.channel_current(lead_channel);
        let follower_in = self.power.channel_current(follower_channel);
        let lead_volts = self.lead.read_voltage();
        let follower_volts = self.follower.read_voltage();

        let output_current = [
            self.output_current(lead_in, lead_volts),
            self.output_current(follower_in, follower_volts),
        ];

        telemetry.put_number_array("liftPos", &[self.height(), self.desired]);
        telemetry.put_number_array(
            "percent",
            &[
                self.lead.read_percent_output(),
                self.follower.read_percent_output(),
            ],
        );
        telemetry.put_number_array(
            "inputLiftCurrent",
            &[self.lead.read_current(), self.follower.read_current()],
        );
        telemetry.put_number_array("outputLiftCurrent", &output_current);
        telemetry.put_number("liftFaults", f64::from(self.faults.bits()));
    }
}

impl Subsystem for Lift {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn name(&self) -> &'static str {
        "lift"
    }

    fn periodic(&mut self, telemetry: &mut dyn Telemetry) {
        if !self.zeroed {
            self.lead.zero_sensor();
            self.zeroed = true;
            info!("lift encoder zeroed");
        }
        self.step_closed_loop();
        self.publish(telemetry);
    }
}
