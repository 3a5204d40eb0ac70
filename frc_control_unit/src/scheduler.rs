//! Cooperative command scheduler.
//!
//! Owns every registered command, the subsystem registry, and the
//! subsystem → owner table. [`Scheduler::run`] is the single coordination
//! pass driven once per tick.
//!
//! ## Tick order
//!
//! 1. Apply cancellations queued since the last pass.
//! 2. Arbitrate newly scheduled commands, all or nothing per command.
//!    Losers' `interrupted()` completes before the winner's `initialize()`.
//! 3. Execute every running command once.
//! 4. End finished commands and release their subsystems. Subsystems a
//!    still-running command no longer requires are released as well.
//! 5. Start the default command of every subsystem left without an owner.
//!    Its first `execute()` happens on the next pass.
//!
//! A default owner can always be preempted. Any other owner is preempted
//! only if it reports itself interruptible; otherwise the newcomer is
//! rejected, stays `NotStarted`, and no ownership changes.
//!
//! Nothing in a pass is fatal. Dropped or rejected requests are recorded in
//! [`SchedulerFault`] flags for telemetry.

pub mod ownership;

use frc_common::consts::{MAX_ACTIVE_COMMANDS, MAX_SUBSYSTEMS};
use frc_common::control_unit::error::SchedulerFault;
use heapless::Vec as FixedVec;
use tracing::{debug, warn};

use crate::command::{Command, CommandId, CommandState};
use crate::error::SchedulerError;
use crate::subsystem::{SubsystemId, SubsystemSet};
use ownership::{AcquireResult, OwnerTable};

type CommandQueue = FixedVec<CommandId, MAX_ACTIVE_COMMANDS>;

struct CommandSlot<R> {
    command: Box<dyn Command<R>>,
    state: CommandState,
    /// Subsystems currently held.
    owned: SubsystemSet,
    /// Running because its subsystem was idle.
    as_default: bool,
    /// Waiting in the pending queue.
    queued: bool,
}

#[derive(Debug)]
struct SubsystemSlot {
    name: &'static str,
    default_command: Option<CommandId>,
}

/// Command scheduler over robot context `R`.
pub struct Scheduler<R> {
    commands: Vec<CommandSlot<R>>,
    subsystems: FixedVec<SubsystemSlot, MAX_SUBSYSTEMS>,
    owners: OwnerTable,
    pending: CommandQueue,
    cancels: CommandQueue,
    running: CommandQueue,
    faults: SchedulerFault,
    tick: u64,
}

impl<R> Default for Scheduler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Scheduler<R> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            subsystems: FixedVec::new(),
            owners: OwnerTable::new(),
            pending: FixedVec::new(),
            cancels: FixedVec::new(),
            running: FixedVec::new(),
            faults: SchedulerFault::empty(),
            tick: 0,
        }
    }

    // ── Registration ────────────────────────────────────────────────

    /// Add a subsystem to the registry. Done once at startup.
    pub fn register_subsystem(&mut self, name: &'static str) -> Result<SubsystemId, SchedulerError> {
        let id = SubsystemId::new(self.subsystems.len()).ok_or(SchedulerError::RegistryFull {
            capacity: MAX_SUBSYSTEMS,
        })?;
        self.subsystems
            .push(SubsystemSlot {
                name,
                default_command: None,
            })
            .map_err(|_| SchedulerError::RegistryFull {
                capacity: MAX_SUBSYSTEMS,
            })?;
        debug!(subsystem = name, %id, "subsystem registered");
        Ok(id)
    }

    /// Hand a command to the scheduler and get its handle back.
    pub fn add_command(&mut self, command: impl Command<R> + 'static) -> CommandId {
        self.add_boxed(Box::new(command))
    }

    pub fn add_boxed(&mut self, command: Box<dyn Command<R>>) -> CommandId {
        let id = CommandId(self.commands.len());
        self.commands.push(CommandSlot {
            command,
            state: CommandState::NotStarted,
            owned: SubsystemSet::empty(),
            as_default: false,
            queued: false,
        });
        id
    }

    /// Register `command` as the default of `subsystem`.
    ///
    /// The command must require the subsystem. A previous default that is
    /// currently running keeps running until preempted.
    pub fn set_default_command(
        &mut self,
        subsystem: SubsystemId,
        command: CommandId,
    ) -> Result<(), SchedulerError> {
        let slot = self
            .commands
            .get(command.index())
            .ok_or(SchedulerError::UnknownCommand(command))?;
        let sub = self
            .subsystems
            .get_mut(subsystem.index())
            .ok_or(SchedulerError::UnknownSubsystem(subsystem))?;

        if !slot.command.requirements().contains_id(subsystem) {
            return Err(SchedulerError::DefaultMissingRequirement {
                command: slot.command.name().to_string(),
                subsystem: sub.name,
            });
        }
        sub.default_command = Some(command);
        Ok(())
    }

    // ── Requests ────────────────────────────────────────────────────

    /// Queue a command for arbitration on the next pass.
    ///
    /// No-op if it is already running or queued.
    pub fn schedule(&mut self, id: CommandId) {
        let Some(slot) = self.commands.get_mut(id.index()) else {
            warn!(%id, "schedule request for unknown command");
            self.faults |= SchedulerFault::UNKNOWN_COMMAND;
            return;
        };
        if slot.queued || slot.state == CommandState::Running {
            return;
        }
        if self.pending.push(id).is_err() {
            warn!(command = slot.command.name(), "pending queue full, schedule dropped");
            self.faults |= SchedulerFault::QUEUE_FULL;
            return;
        }
        slot.queued = true;
        slot.state = CommandState::NotStarted;
    }

    /// Stop a command.
    ///
    /// A queued command is dropped at once. A running command is
    /// interrupted at the start of the next pass.
    pub fn cancel(&mut self, id: CommandId) {
        let Some(slot) = self.commands.get_mut(id.index()) else {
            warn!(%id, "cancel request for unknown command");
            self.faults |= SchedulerFault::UNKNOWN_COMMAND;
            return;
        };
        if slot.queued {
            slot.queued = false;
            self.pending.retain(|&p| p != id);
        }
        if slot.state == CommandState::Running && !self.cancels.contains(&id) {
            // running.len() bounds the number of distinct cancels.
            let _ = self.cancels.push(id);
        }
    }

    /// Cancel every queued and running command, defaults included.
    pub fn cancel_all(&mut self) {
        for id in self.pending.clone().iter().chain(self.running.clone().iter()) {
            self.cancel(*id);
        }
    }

    // ── Coordination pass ───────────────────────────────────────────

    /// Run one coordination pass.
    pub fn run(&mut self, robot: &mut R) {
        self.tick = self.tick.wrapping_add(1);

        self.apply_cancels(robot);
        self.arbitrate(robot);
        self.execute(robot);
        self.reap(robot);
        self.activate_defaults(robot);
    }

    /// Apply queued cancellations now, outside a pass.
    ///
    /// Mode-init hooks use this when no pass will follow, e.g. on disable.
    /// Defaults are not reactivated until the next [`run`](Self::run).
    pub fn flush_cancels(&mut self, robot: &mut R) {
        self.apply_cancels(robot);
    }

    fn apply_cancels(&mut self, robot: &mut R) {
        let cancels = core::mem::take(&mut self.cancels);
        for id in cancels {
            if self.commands[id.index()].state == CommandState::Running {
                self.interrupt(id, robot);
            }
        }
    }

    fn arbitrate(&mut self, robot: &mut R) {
        let pending = core::mem::take(&mut self.pending);
        'pending: for id in pending {
            let slot = &mut self.commands[id.index()];
            slot.queued = false;
            if slot.state == CommandState::Running {
                continue;
            }
            let needs = slot.command.requirements();

            let mut losers: FixedVec<CommandId, MAX_SUBSYSTEMS> = FixedVec::new();
            for (subsystem, owner) in self.owners.holders(needs) {
                let held = &self.commands[owner.index()];
                if !held.as_default && !held.command.is_interruptible() {
                    debug!(
                        command = self.commands[id.index()].command.name(),
                        blocked_by = held.command.name(),
                        subsystem = self.subsystem_name(subsystem),
                        "schedule rejected"
                    );
                    self.faults |= SchedulerFault::REJECTED;
                    continue 'pending;
                }
                if !losers.contains(&owner) {
                    // At most one distinct owner per subsystem.
                    let _ = losers.push(owner);
                }
            }

            if self.running.is_full() && losers.is_empty() {
                warn!(
                    command = self.commands[id.index()].command.name(),
                    "running set full, schedule dropped"
                );
                self.faults |= SchedulerFault::QUEUE_FULL;
                continue;
            }

            for loser in losers {
                self.interrupt(loser, robot);
            }

            if let AcquireResult::Conflict { held_by, .. } = self.owners.try_acquire(needs, id) {
                // Every holder was just interrupted.
                warn!(%id, %held_by, "ownership conflict after preemption");
                continue;
            }
            self.start(id, needs, false, robot);
        }
    }

    fn execute(&mut self, robot: &mut R) {
        for id in self.running.iter() {
            self.commands[id.index()].command.execute(robot);
        }
    }

    fn reap(&mut self, robot: &mut R) {
        let mut i = 0;
        while i < self.running.len() {
            let id = self.running[i];
            let slot = &mut self.commands[id.index()];

            if slot.command.is_finished(robot) {
                slot.command.end(robot);
                slot.state = CommandState::Finished;
                self.owners.release(slot.owned, id);
                slot.owned = SubsystemSet::empty();
                slot.as_default = false;
                debug!(command = slot.command.name(), tick = self.tick, "command finished");
                self.running.remove(i);
                continue;
            }

            let live = slot.command.requirements() & slot.owned;
            if live != slot.owned {
                let released = self.owners.release(slot.owned.difference(live), id);
                slot.owned = live;
                debug!(command = slot.command.name(), released = released.bits(), "requirements shrank");
            }
            i += 1;
        }
    }

    fn activate_defaults(&mut self, robot: &mut R) {
        for index in 0..self.subsystems.len() {
            let Some(subsystem) = SubsystemId::new(index) else {
                break;
            };
            let Some(default) = self.subsystems[index].default_command else {
                continue;
            };
            if self.owners.owner(subsystem).is_some() {
                continue;
            }

            let slot = &self.commands[default.index()];
            if slot.state == CommandState::Running || slot.queued {
                continue;
            }
            let needs = slot.command.requirements();
            if !self.owners.is_free(needs) || self.running.is_full() {
                continue;
            }
            if self.owners.try_acquire(needs, default) == AcquireResult::Acquired {
                debug!(
                    subsystem = self.subsystems[index].name,
                    command = slot.command.name(),
                    "default command activated"
                );
                self.start(default, needs, true, robot);
            }
        }
    }

    /// Mark running and initialize. Ownership must already be assigned.
    fn start(&mut self, id: CommandId, owned: SubsystemSet, as_default: bool, robot: &mut R) {
        let slot = &mut self.commands[id.index()];
        if self.running.push(id).is_err() {
            self.owners.release(owned, id);
            self.faults |= SchedulerFault::QUEUE_FULL;
            return;
        }
        slot.state = CommandState::Running;
        slot.owned = owned;
        slot.as_default = as_default;
        slot.command.initialize(robot);
        if !as_default {
            debug!(command = slot.command.name(), tick = self.tick, "command started");
        }
    }

    fn interrupt(&mut self, id: CommandId, robot: &mut R) {
        let slot = &mut self.commands[id.index()];
        slot.command.interrupted(robot);
        slot.state = CommandState::Interrupted;
        self.owners.release(slot.owned, id);
        slot.owned = SubsystemSet::empty();
        slot.as_default = false;
        self.running.retain(|&r| r != id);
        debug!(command = slot.command.name(), tick = self.tick, "command interrupted");
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn state(&self, id: CommandId) -> Option<CommandState> {
        self.commands.get(id.index()).map(|s| s.state)
    }

    pub fn is_running(&self, id: CommandId) -> bool {
        self.state(id) == Some(CommandState::Running)
    }

    /// Running or waiting for the next pass.
    pub fn is_scheduled(&self, id: CommandId) -> bool {
        self.commands
            .get(id.index())
            .is_some_and(|s| s.queued || s.state == CommandState::Running)
    }

    /// Current owner of a subsystem.
    pub fn owner(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.owners.owner(subsystem)
    }

    pub fn default_command(&self, subsystem: SubsystemId) -> Option<CommandId> {
        self.subsystems
            .get(subsystem.index())
            .and_then(|s| s.default_command)
    }

    pub fn command_name(&self, id: CommandId) -> Option<&str> {
        self.commands.get(id.index()).map(|s| s.command.name())
    }

    pub fn subsystem_name(&self, subsystem: SubsystemId) -> &'static str {
        self.subsystems
            .get(subsystem.index())
            .map_or("unregistered", |s| s.name)
    }

    pub fn subsystem_count(&self) -> usize {
        self.subsystems.len()
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Faults accumulated since the last [`take_faults`](Self::take_faults).
    pub fn faults(&self) -> SchedulerFault {
        self.faults
    }

    pub fn take_faults(&mut self) -> SchedulerFault {
        core::mem::take(&mut self.faults)
    }

    /// Completed coordination passes.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
