//! Robot mode lifecycle.
//!
//! [`ModeStateMachine`] validates mode changes requested by the host.
//! [`RobotRuntime`] owns the scheduler and the robot, runs the mode-init
//! hooks on every accepted change, and performs one periodic step per tick.
//!
//! ```text
//!              ┌──────────── Autonomous ───────────┐
//!              │                 │                 ▼
//!   Disabled ◄─┼─────────────────┴──────────────► Teleop
//!              │
//!              └──────────────── Test
//! ```
//!
//! Every enabled mode returns to Disabled. Autonomous may hand over to
//! Teleop directly.

use frc_common::control_unit::config::RobotConfig;
use frc_common::control_unit::state::RobotMode;
use tracing::{info, warn};

use crate::auto;
use crate::bindings::Bindings;
use crate::command::CommandId;
use crate::error::RuntimeError;
use crate::primitives::{LiftToHeight, RunIntake};
use crate::robot::{Robot, RobotHardware};
use crate::scheduler::Scheduler;
use crate::subsystem::Subsystem;
use crate::teleop::{ArcadeDrive, LiftJoystick};

/// Result of a mode change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded; new mode.
    Ok(RobotMode),
    /// Transition rejected; reason.
    Rejected(&'static str),
}

/// Current mode plus the allowed transitions.
#[derive(Debug, Clone, Default)]
pub struct ModeStateMachine {
    mode: RobotMode,
}

impl ModeStateMachine {
    /// Starts Disabled.
    pub const fn new() -> Self {
        Self {
            mode: RobotMode::Disabled,
        }
    }

    #[inline]
    pub const fn mode(&self) -> RobotMode {
        self.mode
    }

    pub fn request(&mut self, target: RobotMode) -> TransitionResult {
        use RobotMode::*;

        let allowed = match (self.mode, target) {
            (from, to) if from == to => {
                return TransitionResult::Rejected("already in requested mode");
            }
            (Disabled, _) => true,
            (_, Disabled) => true,
            (Autonomous, Teleop) => true,
            _ => false,
        };
        if !allowed {
            return TransitionResult::Rejected(invalid_transition_reason(self.mode));
        }
        self.mode = target;
        TransitionResult::Ok(target)
    }
}

fn invalid_transition_reason(mode: RobotMode) -> &'static str {
    match mode {
        RobotMode::Disabled => "Disabled: any mode allowed",
        RobotMode::Autonomous => "Autonomous: only Teleop or Disabled allowed",
        RobotMode::Teleop => "Teleop: only Disabled allowed",
        RobotMode::Test => "Test: only Disabled allowed",
    }
}

/// Scheduler, robot and mode driver in one place.
pub struct RobotRuntime {
    pub scheduler: Scheduler<Robot>,
    pub robot: Robot,
    pub bindings: Bindings,
    modes: ModeStateMachine,
    auto_command: Option<CommandId>,
    ticks: u64,
}

impl RobotRuntime {
    /// Build the robot, register teleop defaults, button bindings and the
    /// configured autonomous routine.
    pub fn new(config: &RobotConfig, hardware: RobotHardware) -> Result<Self, RuntimeError> {
        let mut scheduler = Scheduler::new();
        let robot = Robot::new(hardware, config, &mut scheduler)?;
        let drive = robot.drivetrain.id();
        let lift = robot.lift.id();
        let intake = robot.intake.id();
        let deadband = config.drive.deadband;
        let controls = &config.controls;

        let arcade = scheduler.add_command(ArcadeDrive::new(drive, controls, deadband));
        scheduler.set_default_command(drive, arcade)?;
        let joystick = scheduler.add_command(LiftJoystick::new(lift, controls, deadband));
        scheduler.set_default_command(lift, joystick)?;

        let mut bindings = Bindings::new();
        let heights = [
            (controls.lift_floor_button, 0.0),
            (controls.lift_switch_button, config.auto.switch_height),
            (controls.lift_scale_button, config.auto.scale_height),
        ];
        for (button, inches) in heights {
            let id = scheduler.add_command(LiftToHeight::new(lift, inches, &config.lift));
            bindings.when_pressed(button, id);
        }
        let eject = scheduler.add_command(RunIntake::eject(intake, &config.intake));
        bindings.when_pressed(controls.eject_button, eject);

        let auto_command = auto::build(config.auto.routine, &robot, config)
            .map(|group| scheduler.add_command(group));
        info!(routine = %config.auto.routine, "autonomous routine selected");

        Ok(Self {
            scheduler,
            robot,
            bindings,
            modes: ModeStateMachine::new(),
            auto_command,
            ticks: 0,
        })
    }

    pub fn mode(&self) -> RobotMode {
        self.modes.mode()
    }

    pub fn auto_command(&self) -> Option<CommandId> {
        self.auto_command
    }

    /// Periodic steps performed since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Change mode and run the init hook of the new mode.
    pub fn set_mode(&mut self, target: RobotMode) -> TransitionResult {
        let from = self.modes.mode();
        let result = self.modes.request(target);
        match result {
            TransitionResult::Ok(mode) => {
                info!(%from, to = %mode, "mode transition");
                self.bindings.reset();
                match mode {
                    RobotMode::Disabled => self.disabled_init(),
                    RobotMode::Autonomous => self.autonomous_init(),
                    RobotMode::Teleop => self.teleop_init(),
                    RobotMode::Test => self.test_init(),
                }
            }
            TransitionResult::Rejected(reason) => {
                warn!(%from, to = %target, reason, "mode transition rejected");
            }
        }
        result
    }

    fn disabled_init(&mut self) {
        self.scheduler.cancel_all();
        self.scheduler.flush_cancels(&mut self.robot);
        self.robot.stop_all();
    }

    fn autonomous_init(&mut self) {
        self.robot.drivetrain.reset_heading();
        if let Some(id) = self.auto_command {
            self.scheduler.schedule(id);
        }
    }

    fn teleop_init(&mut self) {
        if let Some(id) = self.auto_command {
            self.scheduler.cancel(id);
        }
    }

    fn test_init(&mut self) {
        self.scheduler.cancel_all();
        self.scheduler.flush_cancels(&mut self.robot);
        self.robot.stop_all();
    }

    /// One tick: subsystem hooks, then bindings and the scheduler pass in
    /// the modes that run commands, then the scheduler fault word.
    pub fn periodic(&mut self) {
        self.ticks += 1;
        self.robot.periodic();

        let mode = self.modes.mode();
        if mode.runs_scheduler() {
            if mode == RobotMode::Teleop {
                self.bindings
                    .poll(self.robot.input.as_ref(), &mut self.scheduler);
            }
            self.scheduler.run(&mut self.robot);
        }

        let faults = self.scheduler.take_faults();
        let telemetry = self.robot.telemetry();
        telemetry.put_number("schedulerFaults", f64::from(faults.bits()));
        telemetry.put_number("tick", self.ticks as f64);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
