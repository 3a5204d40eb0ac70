//! Integration test: autonomous routines on the simulated robot.
//!
//! Each routine is scheduled through the runtime exactly as in a match and
//! must finish inside the 15 s autonomous period.

use std::io::Write;

use frc_common::config::{ConfigError, ConfigLoader, Validate};
use frc_common::control_unit::config::{AutoRoutine, RobotConfig};
use frc_common::control_unit::state::RobotMode;
use frc_control_unit::command::CommandState;
use frc_control_unit::lifecycle::RobotRuntime;
use frc_control_unit::robot::RobotHardware;
use frc_control_unit::subsystem::Subsystem;
use frc_hal::drivers::simulation::SimWorld;
use frc_hal::telemetry::MemoryTelemetry;

/// 15 s at 50 Hz.
const AUTO_TICKS: u32 = 750;

// ── Helpers ─────────────────────────────────────────────────────────

struct Field {
    runtime: RobotRuntime,
    world: SimWorld,
    telemetry: MemoryTelemetry,
    config: RobotConfig,
}

fn field(routine: AutoRoutine) -> Field {
    let mut config = RobotConfig::default();
    config.auto.routine = routine;
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
    fn tick(&mut self) {
        self.runtime.periodic();
        self.world.step(self.config.tick_period_s());
    }

    /// Run autonomous until the routine finishes. Returns the ticks used.
    fn run_auto(&mut self) -> u32 {
        // One disabled tick first so the lift zeroes as it would pre-match.
        self.tick();
        self.runtime.set_mode(RobotMode::Autonomous);
        let id = self.runtime.auto_command().unwrap();
        for tick in 1..=AUTO_TICKS {
            self.tick();
            if self.runtime.scheduler.state(id) == Some(CommandState::Finished) {
                return tick;
            }
        }
        panic!(
            "{} still {:?} after {AUTO_TICKS} ticks",
            self.config.auto.routine,
            self.runtime.scheduler.state(id)
        );
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn drive_to_switch_stops_at_the_switch() {
    let mut f = field(AutoRoutine::DriveToSwitch);
    f.run_auto();

    let travelled = f.world.drive_distance_inches();
    assert!((travelled - f.config.auto.back_wall_to_switch).abs() < 2.0, "travelled {travelled}");
    assert!(f.world.gyro.true_angle().abs() < 2.0);
    // The arcade default took the drivetrain back with the sticks centred.
    let drive = f.runtime.robot.drivetrain.id();
    f.tick();
    assert_eq!(f.runtime.scheduler.owner(drive), f.runtime.scheduler.default_command(drive));
    assert_eq!(f.runtime.robot.drivetrain.output(), (0.0, 0.0));
}

#[test]
fn left_unowned_scale_scores_within_the_period() {
    let mut f = field(AutoRoutine::LeftUnownedScale);
    let used = f.run_auto();
    assert!(used < AUTO_TICKS);

    let auto = f.config.auto.clone();
    assert!(
        (f.runtime.robot.lift.height() - auto.scale_height).abs() <= f.config.lift.tolerance_inches + 0.5,
        "lift at {}",
        f.runtime.robot.lift.height()
    );
    let expected_heading = auto.long_right_turn + auto.long_left_turn;
    assert!((f.runtime.robot.drivetrain.heading_degrees() - expected_heading).abs() < 5.0);
    assert_eq!(f.runtime.robot.intake.output(), 0.0);

    // The lift keeps holding the scale height after the routine.
    for _ in 0..50 {
        f.tick();
    }
    assert!((f.runtime.robot.lift.height() - auto.scale_height).abs() <= f.config.lift.tolerance_inches + 0.5);
    assert_eq!(f.telemetry.number("schedulerFaults"), Some(0.0));
}

#[test]
fn parallel_lift_saves_time_over_sequential() {
    let sequential = field(AutoRoutine::LeftUnownedScale).run_auto();
    let mut f = field(AutoRoutine::ScaleWithParallelLift);
    let parallel = f.run_auto();

    assert!(parallel < sequential, "parallel {parallel} vs sequential {sequential}");
    assert!((f.runtime.robot.lift.height() - f.config.auto.scale_height).abs() <= 1.5);
}

#[test]
fn no_routine_leaves_the_robot_idle() {
    let mut f = field(AutoRoutine::None);
    assert!(f.runtime.auto_command().is_none());
    f.tick();
    f.runtime.set_mode(RobotMode::Autonomous);
    for _ in 0..20 {
        f.tick();
    }
    assert!(f.world.drive_distance_inches().abs() < 1e-9);
    assert_eq!(f.runtime.robot.intake.output(), 0.0);
}

#[test]
fn shipped_config_runs_the_scale_routine() {
    let config = RobotConfig::from_toml_str(include_str!("../../../config/robot.toml")).unwrap();
    config.validate().unwrap();
    assert_eq!(config.auto.routine, AutoRoutine::LeftUnownedScale);

    let world = SimWorld::new(&config);
    let hardware = RobotHardware::simulated(&world, Box::new(MemoryTelemetry::new()));
    let mut f = Field {
        runtime: RobotRuntime::new(&config, hardware).unwrap(),
        world,
        telemetry: MemoryTelemetry::new(),
        config,
    };
    assert!(f.run_auto() < AUTO_TICKS);
}

#[test]
fn config_file_on_disk_selects_the_routine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
tick_rate_hz = 50

[shared]
service_name = "disk-test"

[auto]
routine = "drive_to_switch"
back_wall_to_switch = 100.0
"#
    )
    .unwrap();

    let config = RobotConfig::load_validated(file.path()).unwrap();
    assert_eq!(config.auto.routine, AutoRoutine::DriveToSwitch);
    assert_eq!(config.auto.back_wall_to_switch, 100.0);
    // Untouched sections keep their defaults.
    assert_eq!(config.lift.max_height_inches, RobotConfig::default().lift.max_height_inches);

    let world = SimWorld::new(&config);
    let hardware = RobotHardware::simulated(&world, Box::new(MemoryTelemetry::new()));
    let mut f = Field {
        runtime: RobotRuntime::new(&config, hardware).unwrap(),
        world,
        telemetry: MemoryTelemetry::new(),
        config,
    };
    f.run_auto();
    assert!((f.world.drive_distance_inches() - 100.0).abs() < 2.0);
}

#[test]
fn invalid_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "tick_rate_hz = 5\n").unwrap();
    assert!(matches!(
        RobotConfig::load_validated(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}
