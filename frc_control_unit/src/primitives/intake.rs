//! Timed intake roller command.

use frc_common::control_unit::config::IntakeConfig;

use crate::command::Command;
use crate::robot::Robot;
use crate::subsystem::{SubsystemId, SubsystemSet};

/// Run the roller at a fixed speed for a number of ticks.
#[derive(Debug, Clone)]
pub struct RunIntake {
    requirements: SubsystemSet,
    speed: f64,
    ticks: u32,
    elapsed: u32,
}

impl RunIntake {
    pub fn new(intake: SubsystemId, speed: f64, ticks: u32) -> Self {
        Self {
            requirements: SubsystemSet::of(intake),
            speed,
            ticks,
            elapsed: 0,
        }
    }

    /// Push the cube out.
    pub fn eject(intake: SubsystemId, config: &IntakeConfig) -> Self {
        Self::new(intake, config.eject_speed, config.eject_ticks)
    }

    /// Pull a cube in.
    pub fn intake(intake: SubsystemId, config: &IntakeConfig) -> Self {
        Self::new(intake, config.intake_speed, config.eject_ticks)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl Command<Robot> for RunIntake {
    fn name(&self) -> &str {
        if self.speed > 0.0 { "EjectCube" } else { "IntakeCube" }
    }

    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn initialize(&mut self, _robot: &mut Robot) {
        self.elapsed = 0;
    }

    fn execute(&mut self, robot: &mut Robot) {
        robot.intake.set_speed(self.speed);
        self.elapsed = self.elapsed.saturating_add(1);
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        self.elapsed >= self.ticks
    }

    fn end(&mut self, robot: &mut Robot) {
        robot.intake.stop();
    }
}
