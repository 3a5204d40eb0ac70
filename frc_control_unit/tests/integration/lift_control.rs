//! Integration test: lift height controller against the simulated mechanism.
//!
//! Validates filter convergence, manual bypass, zero-on-first-step, the
//! forward soft limit and inch/tick conversion.

use frc_common::consts::LIFT_FILTER_LEN;
use frc_common::control_unit::config::RobotConfig;
use frc_control_unit::subsystem::{Subsystem, SubsystemId};
use frc_control_unit::subsystems::{Lift, LiftMode, LiftUnits};
use frc_hal::drivers::simulation::SimWorld;
use frc_hal::telemetry::MemoryTelemetry;

// ── Helpers ─────────────────────────────────────────────────────────

struct Bench {
    world: SimWorld,
    lift: Lift,
    telemetry: MemoryTelemetry,
    dt: f64,
}

fn bench() -> Bench {
    let config = RobotConfig::default();
    let world = SimWorld::new(&config);
    let lift = Lift::new(
        SubsystemId::new(1).unwrap(),
        Box::new(world.lift_lead.clone()),
        Box::new(world.lift_follower.clone()),
        Box::new(world.power.clone()),
        &config.lift,
    )
    .unwrap();
    Bench {
        world,
        lift,
        telemetry: MemoryTelemetry::new(),
        dt: config.tick_period_s(),
    }
}

impl Bench {
    fn tick(&mut self) {
        self.lift.periodic(&mut self.telemetry);
        self.world.step(self.dt);
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn held_setpoint_converges_exactly_after_one_window() {
    let mut b = bench();
    b.tick();
    b.lift.set_target_height(30.0);

    let mut previous = 0.0;
    for _ in 0..LIFT_FILTER_LEN - 1 {
        b.tick();
        let commanded = b.lift.commanded_height();
        assert!(commanded > previous && commanded < 30.0);
        previous = commanded;
    }
    b.tick();
    assert_eq!(b.lift.commanded_height(), 30.0);

    b.ticks(150);
    assert!((b.lift.height() - 30.0).abs() < 1.0, "height {}", b.lift.height());
    assert_eq!(b.telemetry.get("liftPos").map(|v| v[1]), Some(30.0));
}

#[test]
fn one_manual_tick_erases_setpoint_history() {
    let mut b = bench();
    b.tick();
    b.lift.set_target_height(60.0);
    b.ticks(10);

    b.lift.set_manual_output(0.0);
    b.tick();
    assert_eq!(b.lift.mode(), LiftMode::Manual);
    let measured = b.lift.height();
    assert!((b.lift.desired_height() - measured).abs() < 1e-9);

    b.lift.set_target_height(10.0);
    b.lift.periodic(&mut b.telemetry);
    let expected = (measured * (LIFT_FILTER_LEN - 1) as f64 + 10.0) / LIFT_FILTER_LEN as f64;
    assert!(
        (b.lift.commanded_height() - expected).abs() < 1e-9,
        "commanded {} expected {expected}",
        b.lift.commanded_height()
    );
}

#[test]
fn inexact_setpoints_converge_exactly() {
    let mut b = bench();
    b.tick();
    for target in [0.1, 33.3] {
        b.lift.set_target_height(target);
        b.ticks(LIFT_FILTER_LEN);
        assert_eq!(b.lift.commanded_height(), target);
        b.ticks(LIFT_FILTER_LEN);
        assert_eq!(b.lift.commanded_height(), target);
    }
}

#[test]
fn pre_existing_encoder_count_is_zeroed_before_closed_loop() {
    let mut b = bench();
    b.world.lift_lead.set_mechanism_position(5_000.0);
    b.lift.set_target_height(20.0);
    b.lift.periodic(&mut b.telemetry);

    assert!(b.lift.is_zeroed());
    assert_eq!(b.lift.height(), 0.0);
    b.ticks(200);
    assert!((b.lift.height() - 20.0).abs() < 1.0);
}

#[test]
fn full_manual_output_stops_at_soft_limit() {
    let mut b = bench();
    b.tick();
    b.lift.set_manual_output(1.0);
    b.ticks(200);

    let max = b.lift.units().max_inches();
    assert!(b.lift.height() <= max + 1e-9);
    assert!((b.lift.height() - max).abs() < 1e-6);
}

#[test]
fn inches_round_trip_through_the_encoder() {
    let config = RobotConfig::default();
    let units = LiftUnits::new(config.lift.max_height_ticks, config.lift.max_height_inches);
    let mut b = bench();
    b.tick();

    for step in 0..=79 {
        let inches = f64::from(step);
        b.world.lift_lead.set_mechanism_position(units.inches_to_ticks(inches));
        assert!((b.lift.height() - inches).abs() < 1e-9);
        assert!((units.ticks_to_inches(units.inches_to_ticks(inches)) - inches).abs() < 1e-9);
    }
}
