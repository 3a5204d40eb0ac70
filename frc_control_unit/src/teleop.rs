//! Operator-driven default commands.

use frc_common::control_unit::config::ControlsConfig;

use crate::command::Command;
use crate::robot::Robot;
use crate::subsystem::{SubsystemId, SubsystemSet};
use crate::subsystems::LiftMode;

/// Zero inside `±deadband`, unchanged outside.
#[inline]
pub fn apply_deadband(value: f64, deadband: f64) -> f64 {
    if value.abs() < deadband { 0.0 } else { value }
}

/// Arcade drive with forward-scaled turning.
///
/// `left = f + t·|f|`, `right = f − t·|f|`. Near zero forward the robot
/// spins in place at half the turn input. The quick-turn buttons override
/// everything with a full-speed spin. Runs until preempted.
#[derive(Debug, Clone)]
pub struct ArcadeDrive {
    requirements: SubsystemSet,
    controls: ControlsConfig,
    deadband: f64,
}

impl ArcadeDrive {
    pub fn new(drivetrain: SubsystemId, controls: &ControlsConfig, deadband: f64) -> Self {
        Self {
            requirements: SubsystemSet::of(drivetrain),
            controls: controls.clone(),
            deadband,
        }
    }

    /// Side outputs `(left, right)` for one sample of the controls.
    pub fn mix(&self, forward: f64, turn: f64, quick_left: bool, quick_right: bool) -> (f64, f64) {
        let forward = apply_deadband(forward, self.deadband);
        let turn = apply_deadband(turn, self.deadband);

        let (mut left, mut right) = if forward.abs() < self.deadband * 2.0 {
            (turn / 2.0, -turn / 2.0)
        } else {
            (forward + turn * forward.abs(), forward - turn * forward.abs())
        };
        if quick_left {
            (left, right) = (-1.0, 1.0);
        }
        if quick_right {
            (left, right) = (1.0, -1.0);
        }
        (left, right)
    }
}

impl Command<Robot> for ArcadeDrive {
    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn execute(&mut self, robot: &mut Robot) {
        let c = &self.controls;
        // Stick forward reads negative.
        let forward = -robot.input.axis(c.forward_axis);
        let turn = robot.input.axis(c.turn_axis);
        let (left, right) = self.mix(
            forward,
            turn,
            robot.input.button(c.quick_turn_left_button),
            robot.input.button(c.quick_turn_right_button),
        );
        robot.drivetrain.drive_percent(left, right);
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        false
    }

    fn end(&mut self, robot: &mut Robot) {
        robot.drivetrain.stop();
    }
}

/// Manual lift control from one stick axis.
///
/// While the stick is deflected the lift runs open-loop. When it returns to
/// centre the lift switches to holding the height it reached.
#[derive(Debug, Clone)]
pub struct LiftJoystick {
    requirements: SubsystemSet,
    axis: u8,
    deadband: f64,
    holding: bool,
}

impl LiftJoystick {
    pub fn new(lift: SubsystemId, controls: &ControlsConfig, deadband: f64) -> Self {
        Self {
            requirements: SubsystemSet::of(lift),
            axis: controls.lift_axis,
            deadband,
            holding: false,
        }
    }
}

impl Command<Robot> for LiftJoystick {
    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn initialize(&mut self, robot: &mut Robot) {
        // A lift left in closed loop keeps its target.
        if robot.lift.mode() == LiftMode::Manual {
            robot.lift.hold_position();
        }
        self.holding = true;
    }

    fn execute(&mut self, robot: &mut Robot) {
        let up = -apply_deadband(robot.input.axis(self.axis), self.deadband);
        if up != 0.0 {
            robot.lift.set_manual_output(up);
            self.holding = false;
        } else if !self.holding {
            robot.lift.hold_position();
            self.holding = true;
        }
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        false
    }

    fn interrupted(&mut self, robot: &mut Robot) {
        // Never hand over a lift that is still running open-loop.
        if robot.lift.mode() == LiftMode::Manual {
            robot.lift.hold_position();
        }
        self.holding = false;
    }
}
