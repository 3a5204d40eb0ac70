//! Integration test: command groups driven by the scheduler.
//!
//! Validates sequential ordering per pass, parallel start, nested groups and
//! release of subsystems a running group no longer needs.

use frc_control_unit::command::{CommandGroup, CommandState, InstantCommand, WaitTicks};
use frc_control_unit::scheduler::Scheduler;
use frc_control_unit::subsystem::{SubsystemId, SubsystemSet};

use super::{Scripted, Trace};

// ── Helpers ─────────────────────────────────────────────────────────

fn scheduler() -> (Scheduler<Trace>, SubsystemId, SubsystemId) {
    let mut sched = Scheduler::new();
    let x = sched.register_subsystem("drivetrain").unwrap();
    let y = sched.register_subsystem("lift").unwrap();
    (sched, x, y)
}

fn pass(sched: &mut Scheduler<Trace>, trace: &mut Trace) {
    sched.run(trace);
    trace.tick += 1;
}

fn events_at(trace: &Trace, tick: u64) -> Vec<&str> {
    trace
        .events
        .iter()
        .filter(|(t, _)| *t == tick)
        .map(|(_, e)| e.as_str())
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn sequential_children_hand_over_in_the_same_pass() {
    let (mut sched, x, y) = scheduler();
    let mut trace = Trace::default();
    let group = sched.add_command(
        CommandGroup::builder("a_then_b")
            .sequential(Scripted::finishing("a", x.into(), 2))
            .sequential(Scripted::finishing("b", y.into(), 1))
            .build(),
    );

    sched.schedule(group);
    pass(&mut sched, &mut trace); // tick 0
    assert_eq!(events_at(&trace, 0), ["a:init", "a:exec"]);
    assert!(sched.is_running(group));

    pass(&mut sched, &mut trace); // tick 1
    assert_eq!(
        events_at(&trace, 1),
        ["a:exec", "a:end", "b:init", "b:exec", "b:end"]
    );
    assert_eq!(sched.state(group), Some(CommandState::Finished));
    assert_eq!(sched.owner(x), None);
    assert_eq!(sched.owner(y), None);
}

#[test]
fn parallel_children_overlap_the_sequential_one() {
    let (mut sched, x, y) = scheduler();
    let mut trace = Trace::default();
    let group = sched.add_command(
        CommandGroup::builder("lift_while_driving")
            .parallel(Scripted::finishing("lift", y.into(), 3))
            .sequential(Scripted::finishing("drive", x.into(), 1))
            .sequential(Scripted::finishing("after", SubsystemSet::empty(), 1))
            .build(),
    );

    sched.schedule(group);
    pass(&mut sched, &mut trace);
    assert_eq!(
        events_at(&trace, 0),
        [
            "lift:init",
            "lift:exec",
            "drive:init",
            "drive:exec",
            "drive:end",
            "after:init",
            "after:exec",
            "after:end",
        ]
    );
    // The parallel child keeps the group alive.
    assert!(sched.is_running(group));

    pass(&mut sched, &mut trace);
    pass(&mut sched, &mut trace);
    assert_eq!(events_at(&trace, 2), ["lift:exec", "lift:end"]);
    assert_eq!(sched.state(group), Some(CommandState::Finished));
}

#[test]
fn finished_child_frees_its_subsystem_for_the_default() {
    let (mut sched, x, y) = scheduler();
    let mut trace = Trace::default();
    let idle = sched.add_command(Scripted::forever("idle", x.into()));
    sched.set_default_command(x, idle).unwrap();
    let group = sched.add_command(
        CommandGroup::builder("drive_then_lift")
            .sequential(Scripted::finishing("drive", x.into(), 1))
            .sequential(Scripted::finishing("lift", y.into(), 5))
            .build(),
    );

    pass(&mut sched, &mut trace);
    assert_eq!(sched.owner(x), Some(idle));

    sched.schedule(group);
    pass(&mut sched, &mut trace);
    // The drive child finished this pass; the group now needs only the lift.
    assert!(sched.is_running(group));
    assert_eq!(sched.owner(y), Some(group));
    assert_eq!(sched.owner(x), Some(idle));
    assert_eq!(trace.count("idle:init"), 2);
}

#[test]
fn nested_group_runs_inside_parent_sequence() {
    let (mut sched, x, y) = scheduler();
    let mut trace = Trace::default();
    let inner = CommandGroup::builder("inner")
        .parallel(Scripted::finishing("raise", y.into(), 2))
        .sequential(Scripted::finishing("approach", x.into(), 2))
        .build();
    let outer = sched.add_command(
        CommandGroup::builder("outer")
            .sequential(WaitTicks::new(1))
            .sequential(inner)
            .sequential(InstantCommand::new("mark", SubsystemSet::empty(), |t: &mut Trace| {
                t.push("mark", "fired")
            }))
            .build(),
    );

    sched.schedule(outer);
    for _ in 0..4 {
        pass(&mut sched, &mut trace);
    }
    assert_eq!(sched.state(outer), Some(CommandState::Finished));
    assert_eq!(trace.count("mark:fired"), 1);
    let raised = trace.position("raise:end").unwrap();
    let approached = trace.position("approach:end").unwrap();
    assert!(trace.position("mark:fired").unwrap() > raised.max(approached));
}

#[test]
fn interrupting_a_group_reaches_only_running_children() {
    let (mut sched, x, y) = scheduler();
    let mut trace = Trace::default();
    let group = sched.add_command(
        CommandGroup::builder("long")
            .sequential(Scripted::finishing("first", x.into(), 1))
            .sequential(Scripted::forever("second", y.into()))
            .sequential(Scripted::forever("third", x.into()))
            .build(),
    );
    let takeover = sched.add_command(Scripted::forever("takeover", y.into()));

    sched.schedule(group);
    pass(&mut sched, &mut trace);
    sched.schedule(takeover);
    pass(&mut sched, &mut trace);

    assert_eq!(sched.state(group), Some(CommandState::Interrupted));
    assert_eq!(trace.count("second:int"), 1);
    assert_eq!(trace.count("first:int"), 0);
    assert_eq!(trace.count("third:init"), 0);
    assert!(trace.position("second:int").unwrap() < trace.position("takeover:init").unwrap());
    assert_eq!(sched.owner(y), Some(takeover));
}
