//! Differential drivetrain with side encoders and a heading gyro.

use frc_common::control_unit::config::DriveConfig;
use frc_common::control_unit::error::finite_or;
use frc_common::hal::driver::{Gyro, MotorController, Telemetry};

use crate::subsystem::{Subsystem, SubsystemId};

/// Left/right drive sides plus gyro.
pub struct Drivetrain {
    id: SubsystemId,
    left: Box<dyn MotorController>,
    right: Box<dyn MotorController>,
    gyro: Box<dyn Gyro>,
    ticks_per_inch: f64,
}

impl Drivetrain {
    pub fn new(
        id: SubsystemId,
        left: Box<dyn MotorController>,
        right: Box<dyn MotorController>,
        gyro: Box<dyn Gyro>,
        config: &DriveConfig,
    ) -> Self {
        let mut drivetrain = Self {
            id,
            left,
            right,
            gyro,
            ticks_per_inch: config.ticks_per_inch,
        };
        drivetrain.stop();
        drivetrain
    }

    /// Open-loop output per side, each clamped to `[-1, 1]`.
    pub fn drive_percent(&mut self, left: f64, right: f64) {
        self.left
            .command_percent_output(finite_or(left, 0.0).clamp(-1.0, 1.0));
        self.right
            .command_percent_output(finite_or(right, 0.0).clamp(-1.0, 1.0));
    }

    pub fn stop(&mut self) {
        self.left.neutral();
        self.right.neutral();
    }

    pub fn left_inches(&self) -> f64 {
        self.left.read_position() / self.ticks_per_inch
    }

    pub fn right_inches(&self) -> f64 {
        self.right.read_position() / self.ticks_per_inch
    }

    /// Mean of both sides [in].
    pub fn distance_inches(&self) -> f64 {
        (self.left_inches() + self.right_inches()) / 2.0
    }

    /// Heading [deg], positive clockwise.
    pub fn heading_degrees(&self) -> f64 {
        self.gyro.angle_degrees()
    }

    pub fn reset_encoders(&mut self) {
        self.left.zero_sensor();
        self.right.zero_sensor();
    }

    pub fn reset_heading(&mut self) {
        self.gyro.reset();
    }

    /// Applied output `(left, right)`.
    pub fn output(&self) -> (f64, f64) {
        (
            self.left.read_percent_output(),
            self.right.read_percent_output(),
        )
    }
}

impl Subsystem for Drivetrain {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn name(&self) -> &'static str {
        "drivetrain"
    }

    fn periodic(&mut self, telemetry: &mut dyn Telemetry) {
        telemetry.put_number("gyro angle", self.heading_degrees());
        telemetry.put_number_array("driveDistance", &[self.left_inches(), self.right_inches()]);
    }
}
