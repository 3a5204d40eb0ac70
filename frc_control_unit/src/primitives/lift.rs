//! Move the lift to a height and wait until it gets there.

use frc_common::control_unit::config::LiftConfig;

use crate::command::Command;
use crate::control::debounce::Debounce;
use crate::robot::Robot;
use crate::subsystem::{SubsystemId, SubsystemSet};

/// Closed-loop move to `inches`.
///
/// On normal completion the lift keeps holding the target. When preempted it
/// holds wherever it is at that moment.
#[derive(Debug, Clone)]
pub struct LiftToHeight {
    requirements: SubsystemSet,
    inches: f64,
    tolerance: f64,
    settle: Debounce,
}

impl LiftToHeight {
    pub fn new(lift: SubsystemId, inches: f64, config: &LiftConfig) -> Self {
        Self {
            requirements: SubsystemSet::of(lift),
            inches,
            tolerance: config.tolerance_inches,
            settle: Debounce::new(config.settle_ticks),
        }
    }

    pub fn inches(&self) -> f64 {
        self.inches
    }
}

impl Command<Robot> for LiftToHeight {
    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn initialize(&mut self, robot: &mut Robot) {
        self.settle.reset();
        robot.lift.set_target_height(self.inches);
    }

    fn execute(&mut self, robot: &mut Robot) {
        let error = robot.lift.height() - robot.lift.desired_height();
        self.settle.update(error.abs() <= self.tolerance);
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        self.settle.is_settled()
    }

    fn interrupted(&mut self, robot: &mut Robot) {
        robot.lift.hold_position();
    }
}
