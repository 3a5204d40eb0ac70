//! Drivetrain primitives: straight-line distance and in-place turn.

use frc_common::control_unit::config::DriveConfig;

use crate::command::Command;
use crate::control::debounce::Debounce;
use crate::control::pid::{PidGains, PidState, pid_compute_clamped};
use crate::robot::Robot;
use crate::subsystem::{SubsystemId, SubsystemSet};

/// Drive straight for a distance, holding the heading seen at start.
///
/// Distance comes from the mean of both side encoders relative to the
/// reading at `initialize`. Finishes once the error stayed inside the
/// tolerance band for the configured number of ticks.
#[derive(Debug, Clone)]
pub struct DriveDistance {
    requirements: SubsystemSet,
    target_inches: f64,
    gains: PidGains,
    heading_kp: f64,
    max_output: f64,
    tolerance: f64,
    pid: PidState,
    start_inches: f64,
    hold_heading: f64,
    settle: Debounce,
}

impl DriveDistance {
    pub fn new(drivetrain: SubsystemId, inches: f64, config: &DriveConfig) -> Self {
        Self {
            requirements: SubsystemSet::of(drivetrain),
            target_inches: inches,
            gains: PidGains::from_constants(&config.distance, config.max_output),
            heading_kp: config.heading_kp,
            max_output: config.max_output,
            tolerance: config.distance_tolerance_inches,
            pid: PidState::default(),
            start_inches: 0.0,
            hold_heading: 0.0,
            settle: Debounce::new(config.settle_ticks),
        }
    }

    pub fn target_inches(&self) -> f64 {
        self.target_inches
    }
}

impl Command<Robot> for DriveDistance {
    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn initialize(&mut self, robot: &mut Robot) {
        self.pid.reset();
        self.settle.reset();
        self.start_inches = robot.drivetrain.distance_inches();
        self.hold_heading = robot.drivetrain.heading_degrees();
    }

    fn execute(&mut self, robot: &mut Robot) {
        let dt = robot.tick_period_s();
        let travelled = robot.drivetrain.distance_inches() - self.start_inches;
        let error = self.target_inches - travelled;
        let forward = pid_compute_clamped(&mut self.pid, &self.gains, error, dt);
        let correction = self.heading_kp * (self.hold_heading - robot.drivetrain.heading_degrees());

        let limit = self.max_output;
        robot.drivetrain.drive_percent(
            (forward + correction).clamp(-limit, limit),
            (forward - correction).clamp(-limit, limit),
        );
        self.settle.update(error.abs() <= self.tolerance);
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        self.settle.is_settled()
    }

    fn end(&mut self, robot: &mut Robot) {
        robot.drivetrain.stop();
    }
}

/// How a [`TurnAngle`] target is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleReference {
    /// Offset from the heading at `initialize`.
    Relative,
    /// Gyro heading since the last reset.
    Absolute,
}

/// Turn in place to a heading [deg], positive clockwise.
#[derive(Debug, Clone)]
pub struct TurnAngle {
    requirements: SubsystemSet,
    angle: f64,
    reference: AngleReference,
    gains: PidGains,
    tolerance: f64,
    pid: PidState,
    target: f64,
    settle: Debounce,
}

impl TurnAngle {
    pub fn new(
        drivetrain: SubsystemId,
        degrees: f64,
        reference: AngleReference,
        config: &DriveConfig,
    ) -> Self {
        Self {
            requirements: SubsystemSet::of(drivetrain),
            angle: degrees,
            reference,
            gains: PidGains::from_constants(&config.turn, config.max_output),
            tolerance: config.angle_tolerance_degrees,
            pid: PidState::default(),
            target: degrees,
            settle: Debounce::new(config.settle_ticks),
        }
    }

    /// Turn by `degrees` from wherever the robot points when it starts.
    pub fn relative(drivetrain: SubsystemId, degrees: f64, config: &DriveConfig) -> Self {
        Self::new(drivetrain, degrees, AngleReference::Relative, config)
    }

    /// Resolved heading target; valid once initialized.
    pub fn target_degrees(&self) -> f64 {
        self.target
    }
}

impl Command<Robot> for TurnAngle {
    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn initialize(&mut self, robot: &mut Robot) {
        self.pid.reset();
        self.settle.reset();
        self.target = match self.reference {
            AngleReference::Relative => robot.drivetrain.heading_degrees() + self.angle,
            AngleReference::Absolute => self.angle,
        };
    }

    fn execute(&mut self, robot: &mut Robot) {
        let dt = robot.tick_period_s();
        let error = self.target - robot.drivetrain.heading_degrees();
        let output = pid_compute_clamped(&mut self.pid, &self.gains, error, dt);
        robot.drivetrain.drive_percent(output, -output);
        self.settle.update(error.abs() <= self.tolerance);
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        self.settle.is_settled()
    }

    fn end(&mut self, robot: &mut Robot) {
        robot.drivetrain.stop();
    }
}
