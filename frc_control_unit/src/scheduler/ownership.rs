//! Subsystem ownership table.
//!
//! One owner slot per registry index. A subsystem is either free or held by
//! exactly one command, so mutual exclusion holds by construction.

use frc_common::consts::MAX_SUBSYSTEMS;

use crate::command::CommandId;
use crate::subsystem::{SubsystemId, SubsystemSet};

/// Result of an acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireResult {
    /// Every requested subsystem now belongs to the caller.
    Acquired,
    /// Nothing changed; `subsystem` is held by `held_by`.
    Conflict {
        subsystem: SubsystemId,
        held_by: CommandId,
    },
}

/// Fixed-size subsystem → owner map.
#[derive(Debug, Clone)]
pub struct OwnerTable {
    owners: [Option<CommandId>; MAX_SUBSYSTEMS],
}

impl Default for OwnerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerTable {
    pub const fn new() -> Self {
        Self {
            owners: [None; MAX_SUBSYSTEMS],
        }
    }

    #[inline]
    pub fn owner(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.owners[subsystem.index()]
    }

    /// Owners of the members of `set`, in registry order.
    pub fn holders(&self, set: SubsystemSet) -> impl Iterator<Item = (SubsystemId, CommandId)> + '_ {
        set.ids()
            .filter_map(|s| self.owners[s.index()].map(|owner| (s, owner)))
    }

    #[inline]
    pub fn is_free(&self, set: SubsystemSet) -> bool {
        self.holders(set).next().is_none()
    }

    /// Take every subsystem in `set` for `command`, all or nothing.
    ///
    /// Subsystems already held by `command` do not conflict.
    pub fn try_acquire(&mut self, set: SubsystemSet, command: CommandId) -> AcquireResult {
        if let Some((subsystem, held_by)) = self.holders(set).find(|&(_, owner)| owner != command) {
            return AcquireResult::Conflict { subsystem, held_by };
        }
        for s in set.ids() {
            self.owners[s.index()] = Some(command);
        }
        AcquireResult::Acquired
    }

    /// Release the members of `set` held by `command`; returns what was released.
    pub fn release(&mut self, set: SubsystemSet, command: CommandId) -> SubsystemSet {
        let mut released = SubsystemSet::empty();
        for s in set.ids() {
            if self.owners[s.index()] == Some(command) {
                self.owners[s.index()] = None;
                released = released.with(s);
            }
        }
        released
    }

    /// Every subsystem held by `command`.
    pub fn owned_by(&self, command: CommandId) -> SubsystemSet {
        self.owners
            .iter()
            .enumerate()
            .filter(|&(_, owner)| *owner == Some(command))
            .filter_map(|(i, _)| SubsystemId::new(i))
            .fold(SubsystemSet::empty(), SubsystemSet::with)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
