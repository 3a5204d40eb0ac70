//! Command contract and lifecycle.
//!
//! A command is a unit of behavior that requires zero or more subsystems,
//! runs once per tick while scheduled, and reports completion. Commands are
//! generic over the robot context `R` they act on; the scheduler hands that
//! context to every lifecycle callback.
//!
//! ## Lifecycle
//!
//! ```text
//! NotStarted ──initialize──▶ Running ──is_finished──▶ Finished    (end)
//!                               └──────preempted────▶ Interrupted (interrupted)
//! ```
//!
//! `initialize` runs exactly once before the first `execute`. Cleanup runs
//! exactly once, through `end` or `interrupted`, whichever terminal state is
//! reached. Both must leave owned hardware neutral.

pub mod basic;
pub mod group;

use std::any::type_name;
use std::fmt;

use crate::subsystem::SubsystemSet;

pub use basic::{InstantCommand, WaitTicks};
pub use group::{ChildMode, CommandGroup, CommandGroupBuilder};

/// Handle of a command registered with a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

impl CommandId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command#{}", self.0)
    }
}

/// Lifecycle state of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandState {
    #[default]
    NotStarted,
    Running,
    Finished,
    Interrupted,
}

impl CommandState {
    /// Finished or Interrupted.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Interrupted)
    }
}

/// Behavior driven by the scheduler.
///
/// `is_finished` is a pure predicate: it is evaluated once per tick after
/// `execute` and must keep returning the same answer when re-evaluated.
/// Counters and debounce state belong in `execute`.
pub trait Command<R> {
    /// Name used in log lines.
    fn name(&self) -> &str {
        let full = type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Subsystems this command needs exclusive access to.
    fn requirements(&self) -> SubsystemSet;

    /// Whether a newly scheduled conflicting command may preempt this one.
    fn is_interruptible(&self) -> bool {
        true
    }

    fn initialize(&mut self, _robot: &mut R) {}

    fn execute(&mut self, _robot: &mut R) {}

    fn is_finished(&self, robot: &R) -> bool;

    /// Cleanup after normal completion.
    fn end(&mut self, _robot: &mut R) {}

    /// Cleanup after preemption. Defaults to `end`.
    fn interrupted(&mut self, robot: &mut R) {
        self.end(robot);
    }
}

impl<R, C: Command<R> + ?Sized> Command<R> for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn requirements(&self) -> SubsystemSet {
        (**self).requirements()
    }

    fn is_interruptible(&self) -> bool {
        (**self).is_interruptible()
    }

    fn initialize(&mut self, robot: &mut R) {
        (**self).initialize(robot);
    }

    fn execute(&mut self, robot: &mut R) {
        (**self).execute(robot);
    }

    fn is_finished(&self, robot: &R) -> bool {
        (**self).is_finished(robot)
    }

    fn end(&mut self, robot: &mut R) {
        (**self).end(robot);
    }

    fn interrupted(&mut self, robot: &mut R) {
        (**self).interrupted(robot);
    }
}
