//! Cube intake roller.

use frc_common::control_unit::error::finite_or;
use frc_common::hal::driver::{MotorController, Telemetry};

use crate::subsystem::{Subsystem, SubsystemId};

pub struct Intake {
    id: SubsystemId,
    motor: Box<dyn MotorController>,
}

impl Intake {
    pub fn new(id: SubsystemId, motor: Box<dyn MotorController>) -> Self {
        let mut intake = Self { id, motor };
        intake.stop();
        intake
    }

    /// Roller output in `[-1, 1]`; positive ejects.
    pub fn set_speed(&mut self, speed: f64) {
        self.motor
            .command_percent_output(finite_or(speed, 0.0).clamp(-1.0, 1.0));
    }

    pub fn stop(&mut self) {
        self.motor.neutral();
    }

    pub fn output(&self) -> f64 {
        self.motor.read_percent_output()
    }
}

impl Subsystem for Intake {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn name(&self) -> &'static str {
        "intake"
    }

    fn periodic(&mut self, telemetry: &mut dyn Telemetry) {
        telemetry.put_number("intakeOutput", self.output());
    }
}
