//! Integration test: subsystem arbitration under a long mixed workload.
//!
//! Validates exclusive ownership on every pass, interruption ordering and
//! all-or-nothing rejection.

use frc_common::control_unit::error::SchedulerFault;
use frc_control_unit::command::{CommandId, CommandState};
use frc_control_unit::scheduler::Scheduler;
use frc_control_unit::subsystem::{SubsystemId, SubsystemSet};

use super::{Scripted, Trace};

// ── Helpers ─────────────────────────────────────────────────────────

struct Rig {
    sched: Scheduler<Trace>,
    trace: Trace,
    subsystems: Vec<SubsystemId>,
}

fn rig(count: usize) -> Rig {
    let names = ["drivetrain", "lift", "intake", "climber"];
    let mut sched = Scheduler::new();
    let subsystems = names[..count]
        .iter()
        .map(|&name| sched.register_subsystem(name).unwrap())
        .collect();
    Rig {
        sched,
        trace: Trace::default(),
        subsystems,
    }
}

impl Rig {
    fn set(&self, indices: &[usize]) -> SubsystemSet {
        indices
            .iter()
            .fold(SubsystemSet::empty(), |s, &i| s.with(self.subsystems[i]))
    }

    fn run(&mut self) {
        self.trace.tick += 1;
        self.sched.run(&mut self.trace);
    }
}

/// Deterministic xorshift so the workload is reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn at_most_one_owner_per_subsystem_on_every_pass() {
    let mut r = rig(3);
    let shapes: [&[usize]; 7] = [&[0], &[1], &[2], &[0, 1], &[1, 2], &[0, 2], &[0, 1, 2]];

    let mut commands: Vec<(CommandId, SubsystemSet)> = Vec::new();
    for (i, shape) in shapes.iter().enumerate() {
        let needs = r.set(shape);
        let tag: &'static str = Box::leak(format!("c{i}").into_boxed_str());
        let command = if i % 3 == 0 {
            Scripted::finishing(tag, needs, 3 + i as u32).stubborn()
        } else if i % 3 == 1 {
            Scripted::finishing(tag, needs, 2 + i as u32)
        } else {
            Scripted::forever(tag, needs)
        };
        commands.push((r.sched.add_command(command), needs));
    }
    for (slot, &subsystem) in r.subsystems.clone().iter().enumerate() {
        let tag: &'static str = ["d0", "d1", "d2"][slot];
        let id = r.sched.add_command(Scripted::forever(tag, subsystem.into()));
        r.sched.set_default_command(subsystem, id).unwrap();
        commands.push((id, subsystem.into()));
    }

    let mut rng = XorShift(0x2545_F491_4F6C_DD1D);
    for _ in 0..400 {
        for _ in 0..rng.below(3) {
            let (id, _) = commands[rng.below(shapes.len())];
            if rng.below(5) == 0 {
                r.sched.cancel(id);
            } else {
                r.sched.schedule(id);
            }
        }
        r.run();

        let running: Vec<_> = commands
            .iter()
            .filter(|(id, _)| r.sched.is_running(*id))
            .collect();
        for (i, (a, needs_a)) in running.iter().enumerate() {
            for (b, needs_b) in &running[i + 1..] {
                assert!(
                    !needs_a.intersects(*needs_b),
                    "{a} and {b} share a subsystem on pass {}",
                    r.sched.tick()
                );
            }
            for subsystem in needs_a.ids() {
                assert_eq!(r.sched.owner(subsystem), Some(*a));
            }
        }
        for &subsystem in &r.subsystems {
            if let Some(owner) = r.sched.owner(subsystem) {
                assert!(r.sched.is_running(owner));
            }
        }
    }
}

#[test]
fn every_interruption_precedes_the_winner_and_happens_once() {
    let mut r = rig(2);
    let both = r.set(&[0, 1]);
    let a = r.sched.add_command(Scripted::forever("a", both));
    let b = r.sched.add_command(Scripted::forever("b", r.set(&[0])));
    let c = r.sched.add_command(Scripted::forever("c", r.set(&[1])));

    r.sched.schedule(a);
    r.run();
    r.sched.schedule(b);
    r.sched.schedule(c);
    r.run();

    assert_eq!(r.trace.count("a:int"), 1);
    let interrupted = r.trace.position("a:int").unwrap();
    assert!(interrupted < r.trace.position("b:init").unwrap());
    assert!(interrupted < r.trace.position("c:init").unwrap());
    assert_eq!(r.sched.state(a), Some(CommandState::Interrupted));
    assert!(r.sched.is_running(b));
    assert!(r.sched.is_running(c));
    assert_eq!(r.trace.count("a:end"), 0);
}

#[test]
fn blocked_request_changes_no_ownership() {
    let mut r = rig(2);
    let (x, y) = (r.subsystems[0], r.subsystems[1]);
    let d = r.sched.add_command(Scripted::forever("d", x.into()).stubborn());
    let e = r.sched.add_command(Scripted::forever("e", y.into()));
    let c = r.sched.add_command(Scripted::forever("c", r.set(&[0, 1])));

    r.sched.schedule(d);
    r.sched.schedule(e);
    r.run();
    r.sched.schedule(c);
    r.run();

    assert_eq!(r.sched.owner(x), Some(d));
    assert_eq!(r.sched.owner(y), Some(e));
    assert_eq!(r.sched.state(c), Some(CommandState::NotStarted));
    assert!(!r.sched.is_scheduled(c));
    assert_eq!(r.trace.count("e:int"), 0);
    assert_eq!(r.trace.count("c:init"), 0);
    assert!(r.sched.take_faults().contains(SchedulerFault::REJECTED));
}

#[test]
fn default_returns_after_preemptor_finishes() {
    let mut r = rig(1);
    let x = r.subsystems[0];
    let idle = r.sched.add_command(Scripted::forever("idle", x.into()));
    r.sched.set_default_command(x, idle).unwrap();
    let burst = r.sched.add_command(Scripted::finishing("burst", x.into(), 2));

    r.run();
    assert_eq!(r.sched.owner(x), Some(idle));

    r.sched.schedule(burst);
    r.run();
    r.run();
    assert_eq!(r.sched.state(burst), Some(CommandState::Finished));
    // Reactivated in the same pass the preemptor finished.
    assert_eq!(r.sched.owner(x), Some(idle));
    assert_eq!(r.trace.count("idle:init"), 2);
    assert_eq!(r.trace.count("idle:int"), 1);
}
