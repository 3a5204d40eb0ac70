//! Utility commands.

use std::marker::PhantomData;

use super::Command;
use crate::subsystem::SubsystemSet;

/// Runs a closure once in `initialize` and finishes immediately.
pub struct InstantCommand<R, F> {
    name: &'static str,
    requirements: SubsystemSet,
    action: F,
    done: bool,
    _robot: PhantomData<fn(&mut R)>,
}

impl<R, F: FnMut(&mut R)> InstantCommand<R, F> {
    pub fn new(name: &'static str, requirements: SubsystemSet, action: F) -> Self {
        Self {
            name,
            requirements,
            action,
            done: false,
            _robot: PhantomData,
        }
    }
}

impl<R, F: FnMut(&mut R)> Command<R> for InstantCommand<R, F> {
    fn name(&self) -> &str {
        self.name
    }

    fn requirements(&self) -> SubsystemSet {
        self.requirements
    }

    fn initialize(&mut self, robot: &mut R) {
        (self.action)(robot);
        self.done = true;
    }

    fn is_finished(&self, _robot: &R) -> bool {
        self.done
    }
}

/// Finishes after `ticks` executes. Requires nothing.
#[derive(Debug, Clone, Copy)]
pub struct WaitTicks {
    ticks: u32,
    elapsed: u32,
}

impl WaitTicks {
    pub const fn new(ticks: u32) -> Self {
        Self { ticks, elapsed: 0 }
    }

    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }
}

impl<R> Command<R> for WaitTicks {
    fn requirements(&self) -> SubsystemSet {
        SubsystemSet::empty()
    }

    fn initialize(&mut self, _robot: &mut R) {
        self.elapsed = 0;
    }

    fn execute(&mut self, _robot: &mut R) {
        self.elapsed = self.elapsed.saturating_add(1);
    }

    fn is_finished(&self, _robot: &R) -> bool {
        self.elapsed >= self.ticks
    }
}
