//! Command composition.
//!
//! A [`CommandGroup`] runs an ordered list of children, each tagged
//! [`ChildMode::Sequential`] or [`ChildMode::Parallel`], and satisfies the
//! [`Command`] contract itself so groups nest.
//!
//! Groups are assembled through [`CommandGroupBuilder`] and cannot gain
//! children once built, so a running group is never mutated.
//!
//! ## Tick semantics
//!
//! 1. Every running child executes once; finished children are ended.
//! 2. The cursor walks forward: a parallel child starts and the walk
//!    continues, a sequential child starts and the walk stops until it
//!    reaches a terminal state. A child started here executes in the same
//!    tick, so no tick is spent on a sequential boundary.
//!
//! A child that shares a subsystem with a running older sibling interrupts
//! it on start, unless that sibling is non-interruptible. Then the cursor
//! holds until the sibling reaches a terminal state.
//!
//! Requirements are the union of all children before the group starts and
//! the union of non-terminal children afterwards.

use tracing::debug;

use super::{Command, CommandState};
use crate::subsystem::SubsystemSet;

/// How a child is scheduled relative to the children after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildMode {
    /// Later children wait for this one to reach a terminal state.
    Sequential,
    /// Later children start without waiting.
    Parallel,
}

struct Child<R> {
    command: Box<dyn Command<R>>,
    mode: ChildMode,
    state: CommandState,
}

impl<R> Child<R> {
    /// Run one step; end the child if it reports finished.
    fn step(&mut self, robot: &mut R) {
        self.command.execute(robot);
        if self.command.is_finished(robot) {
            self.command.end(robot);
            self.state = CommandState::Finished;
        }
    }
}

/// Append-only builder for [`CommandGroup`].
pub struct CommandGroupBuilder<R> {
    name: String,
    children: Vec<Child<R>>,
    interruptible: bool,
}

impl<R> CommandGroupBuilder<R> {
    /// Append a child that blocks later children until it completes.
    #[must_use]
    pub fn sequential(self, command: impl Command<R> + 'static) -> Self {
        self.push(Box::new(command), ChildMode::Sequential)
    }

    /// Append a child that runs alongside later children.
    #[must_use]
    pub fn parallel(self, command: impl Command<R> + 'static) -> Self {
        self.push(Box::new(command), ChildMode::Parallel)
    }

    /// Append an already boxed child.
    #[must_use]
    pub fn push(mut self, command: Box<dyn Command<R>>, mode: ChildMode) -> Self {
        self.children.push(Child {
            command,
            mode,
            state: CommandState::NotStarted,
        });
        self
    }

    /// Group-level interruptible flag (default true).
    #[must_use]
    pub fn interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = interruptible;
        self
    }

    pub fn build(self) -> CommandGroup<R> {
        CommandGroup {
            name: self.name,
            children: self.children,
            interruptible: self.interruptible,
            cursor: 0,
            active_sequential: None,
            started: false,
        }
    }
}

/// Composite command running children sequentially and in parallel.
pub struct CommandGroup<R> {
    name: String,
    children: Vec<Child<R>>,
    interruptible: bool,
    /// Next child to start.
    cursor: usize,
    /// Sequential child currently blocking the cursor.
    active_sequential: Option<usize>,
    started: bool,
}

impl<R> CommandGroup<R> {
    pub fn builder(name: impl Into<String>) -> CommandGroupBuilder<R> {
        CommandGroupBuilder {
            name: name.into(),
            children: Vec::new(),
            interruptible: true,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Lifecycle state of each child, in insertion order.
    pub fn child_states(&self) -> impl Iterator<Item = CommandState> + '_ {
        self.children.iter().map(|c| c.state)
    }

    /// A running sibling that shares a subsystem with `index` and refuses
    /// interruption.
    fn blocking_sibling(&self, index: usize) -> Option<usize> {
        let needs = self.children[index].command.requirements();
        if needs.is_empty() {
            return None;
        }
        self.children.iter().enumerate().position(|(i, other)| {
            i != index
                && other.state == CommandState::Running
                && !other.command.is_interruptible()
                && other.command.requirements().intersects(needs)
        })
    }

    fn start_child(&mut self, index: usize, robot: &mut R) {
        let needs = self.children[index].command.requirements();
        if !needs.is_empty() {
            // A newer child takes over subsystems from older running siblings.
            for (i, other) in self.children.iter_mut().enumerate() {
                if i != index
                    && other.state == CommandState::Running
                    && other.command.requirements().intersects(needs)
                {
                    debug!(group = %self.name, child = other.command.name(), "child interrupted by sibling");
                    other.command.interrupted(robot);
                    other.state = CommandState::Interrupted;
                }
            }
        }

        let child = &mut self.children[index];
        child.command.initialize(robot);
        child.state = CommandState::Running;
    }

    fn advance(&mut self, robot: &mut R) {
        loop {
            if let Some(active) = self.active_sequential {
                if self.children[active].state == CommandState::Running {
                    break;
                }
                self.active_sequential = None;
            }
            if self.cursor >= self.children.len() {
                break;
            }

            let index = self.cursor;
            if let Some(blocker) = self.blocking_sibling(index) {
                debug!(
                    group = %self.name,
                    child = self.children[index].command.name(),
                    held_by = self.children[blocker].command.name(),
                    "child waiting on non-interruptible sibling"
                );
                break;
            }
            self.cursor += 1;
            self.start_child(index, robot);

            let child = &mut self.children[index];
            child.step(robot);
            if child.mode == ChildMode::Sequential {
                self.active_sequential = Some(index);
            }
        }
    }

    fn any_running(&self) -> bool {
        self.children.iter().any(|c| c.state == CommandState::Running)
    }
}

impl<R> Command<R> for CommandGroup<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> SubsystemSet {
        self.children
            .iter()
            .filter(|c| !self.started || !c.state.is_terminal())
            .fold(SubsystemSet::empty(), |acc, c| acc | c.command.requirements())
    }

    fn is_interruptible(&self) -> bool {
        self.interruptible
            && self
                .children
                .iter()
                .filter(|c| c.state == CommandState::Running)
                .all(|c| c.command.is_interruptible())
    }

    fn initialize(&mut self, _robot: &mut R) {
        for child in &mut self.children {
            child.state = CommandState::NotStarted;
        }
        self.cursor = 0;
        self.active_sequential = None;
        self.started = true;
    }

    fn execute(&mut self, robot: &mut R) {
        for child in &mut self.children {
            if child.state == CommandState::Running {
                child.step(robot);
            }
        }
        self.advance(robot);
    }

    fn is_finished(&self, _robot: &R) -> bool {
        self.cursor >= self.children.len() && !self.any_running()
    }

    fn end(&mut self, robot: &mut R) {
        for child in &mut self.children {
            if child.state == CommandState::Running {
                child.command.end(robot);
                child.state = CommandState::Finished;
            }
        }
        self.started = false;
    }

    fn interrupted(&mut self, robot: &mut R) {
        for child in &mut self.children {
            if child.state == CommandState::Running {
                child.command.interrupted(robot);
                child.state = CommandState::Interrupted;
            }
        }
        self.started = false;
    }
}
