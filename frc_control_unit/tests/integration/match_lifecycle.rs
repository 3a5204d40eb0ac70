//! Integration test: a full match through the mode runtime.
//!
//! Validates Disabled → Autonomous → Teleop → Disabled with operator input,
//! button bindings and default commands on the simulated robot.

use frc_common::prelude::*;
use frc_control_unit::command::{Command, CommandState};
use frc_control_unit::lifecycle::{RobotRuntime, TransitionResult};
use frc_control_unit::robot::{Robot, RobotHardware};
use frc_control_unit::subsystem::{Subsystem, SubsystemSet};
use frc_control_unit::subsystems::LiftMode;
use frc_hal::drivers::simulation::SimWorld;
use frc_hal::telemetry::MemoryTelemetry;

// ── Helpers ─────────────────────────────────────────────────────────

struct Field {
    runtime: RobotRuntime,
    world: SimWorld,
    telemetry: MemoryTelemetry,
    config: RobotConfig,
}

fn field() -> Field {
    let config = RobotConfig::default();
    let world = SimWorld::new(&config);
    let telemetry = MemoryTelemetry::new();
    let hardware = RobotHardware::simulated(&world, Box::new(telemetry.clone()));
    let runtime = RobotRuntime::new(&config, hardware).unwrap();
    Field {
        runtime,
        world,
        telemetry,
        config,
    }
}

impl Field {
    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.runtime.periodic();
            self.world.step(self.config.tick_period_s());
        }
    }

    fn press(&mut self, button: u8) {
        self.world.input.set_button(button, true);
        self.ticks(1);
        self.world.input.set_button(button, false);
    }
}

/// Owns the lift and never commands it.
struct ParkLift(SubsystemSet);

impl Command<Robot> for ParkLift {
    fn requirements(&self) -> SubsystemSet {
        self.0
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        false
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn full_match_sequence() {
    let mut f = field();
    let controls = f.config.controls.clone();
    assert!((f.config.tick_period_s() - DEFAULT_TICK_PERIOD.as_secs_f64()).abs() < 1e-12);

    // Pre-match: hooks run, commands do not.
    f.ticks(5);
    assert_eq!(f.runtime.scheduler.tick(), 0);
    assert!(f.runtime.robot.lift.is_zeroed());

    // Autonomous: drive to the switch.
    assert_eq!(f.runtime.set_mode(RobotMode::Autonomous), TransitionResult::Ok(RobotMode::Autonomous));
    f.ticks(750);
    let auto = f.runtime.auto_command().unwrap();
    assert_eq!(f.runtime.scheduler.state(auto), Some(CommandState::Finished));
    let after_auto = f.world.drive_distance_inches();

    // Teleop: drive forward on the stick.
    assert_eq!(f.runtime.set_mode(RobotMode::Teleop), TransitionResult::Ok(RobotMode::Teleop));
    f.world.input.set_axis(controls.forward_axis, -0.5);
    f.ticks(50);
    f.world.input.set_axis(controls.forward_axis, 0.0);
    f.ticks(5);
    assert!(f.world.drive_distance_inches() > after_auto + 30.0);
    assert_eq!(f.runtime.robot.drivetrain.output(), (0.0, 0.0));

    // Switch-height button preempts the lift default, which returns after.
    let lift = f.runtime.robot.lift.id();
    let joystick = f.runtime.scheduler.default_command(lift);
    f.press(controls.lift_switch_button);
    assert_ne!(f.runtime.scheduler.owner(lift), joystick);
    f.ticks(200);
    assert!((f.runtime.robot.lift.height() - f.config.auto.switch_height).abs() <= 1.5);
    assert_eq!(f.runtime.scheduler.owner(lift), joystick);

    // Manual lift on the stick.
    let before = f.runtime.robot.lift.height();
    f.world.input.set_axis(controls.lift_axis, 0.6);
    f.ticks(10);
    assert_eq!(f.runtime.robot.lift.mode(), LiftMode::Manual);
    assert!(f.runtime.robot.lift.height() < before);
    f.world.input.set_axis(controls.lift_axis, 0.0);
    f.ticks(2);
    assert_eq!(f.runtime.robot.lift.mode(), LiftMode::ClosedLoop);

    // Eject runs for its configured duration.
    f.press(controls.eject_button);
    assert!(f.runtime.robot.intake.output() > 0.0);
    f.ticks(f.config.intake.eject_ticks as usize + 2);
    assert_eq!(f.runtime.robot.intake.output(), 0.0);

    // Disable stops everything at once.
    f.world.input.set_axis(controls.forward_axis, -1.0);
    f.ticks(2);
    assert_eq!(f.runtime.set_mode(RobotMode::Disabled), TransitionResult::Ok(RobotMode::Disabled));
    assert_eq!(f.runtime.scheduler.running_count(), 0);
    assert_eq!(f.runtime.robot.drivetrain.output(), (0.0, 0.0));
    let tick = f.runtime.scheduler.tick();
    f.ticks(10);
    assert_eq!(f.runtime.scheduler.tick(), tick);
    assert_eq!(f.runtime.robot.drivetrain.output(), (0.0, 0.0));
    assert_eq!(f.telemetry.number("schedulerFaults"), Some(0.0));
}

#[test]
fn rejected_mode_change_keeps_current_mode() {
    let mut f = field();
    f.runtime.set_mode(RobotMode::Teleop);
    assert!(matches!(
        f.runtime.set_mode(RobotMode::Autonomous),
        TransitionResult::Rejected(_)
    ));
    assert_eq!(f.runtime.mode(), RobotMode::Teleop);
    assert!(matches!(f.runtime.set_mode(RobotMode::Test), TransitionResult::Rejected(_)));
}

#[test]
fn bindings_are_ignored_outside_teleop() {
    let mut f = field();
    let eject = f.config.controls.eject_button;
    f.world.input.set_button(eject, true);
    f.ticks(3);
    assert_eq!(f.runtime.robot.intake.output(), 0.0);

    f.runtime.set_mode(RobotMode::Test);
    f.ticks(3);
    assert_eq!(f.runtime.robot.intake.output(), 0.0);
}

#[test]
fn second_autonomous_restarts_the_routine() {
    let mut f = field();
    let auto = f.runtime.auto_command().unwrap();
    f.runtime.set_mode(RobotMode::Autonomous);
    f.ticks(20);
    assert!(f.runtime.scheduler.is_running(auto));

    f.runtime.set_mode(RobotMode::Disabled);
    assert_eq!(f.runtime.scheduler.state(auto), Some(CommandState::Interrupted));

    let start = f.world.drive_distance_inches();
    f.runtime.set_mode(RobotMode::Autonomous);
    f.ticks(750);
    assert_eq!(f.runtime.scheduler.state(auto), Some(CommandState::Finished));
    // The drive target is relative to where the second run began.
    let travelled = f.world.drive_distance_inches() - start;
    assert!((travelled - f.config.auto.back_wall_to_switch).abs() < 2.0, "travelled {travelled}");
}

#[test]
fn preempted_lift_joystick_leaves_the_lift_holding() {
    let mut f = field();
    let lift = f.runtime.robot.lift.id();
    f.ticks(1);
    f.runtime.set_mode(RobotMode::Teleop);

    f.world.input.set_axis(f.config.controls.lift_axis, -0.8);
    f.ticks(5);
    assert_eq!(f.runtime.robot.lift.mode(), LiftMode::Manual);
    assert!(f.runtime.robot.lift.height() > 0.0);

    let park = f.runtime.scheduler.add_command(ParkLift(SubsystemSet::of(lift)));
    f.runtime.scheduler.schedule(park);
    f.ticks(1);
    assert_eq!(f.runtime.scheduler.owner(lift), Some(park));
    assert_eq!(f.runtime.robot.lift.mode(), LiftMode::ClosedLoop);
    let held = f.runtime.robot.lift.desired_height();

    // The stick no longer reaches the lift and nothing else drives it.
    f.world.input.set_axis(f.config.controls.lift_axis, 0.0);
    f.ticks(10);
    assert_eq!(f.runtime.scheduler.owner(lift), Some(park));
    assert_eq!(f.runtime.robot.lift.mode(), LiftMode::ClosedLoop);
    assert_eq!(f.runtime.robot.lift.desired_height(), held);
    let height = f.runtime.robot.lift.height();
    assert!((height - held).abs() < 1.0, "lift drifted to {height} from {held}");
}
