//! Error types for the control unit.
//!
//! Only registration and startup can fail. Arbitration conflicts inside a
//! tick are not errors; they are reported through `SchedulerFault` flags.

use thiserror::Error;

use crate::command::CommandId;
use crate::subsystem::SubsystemId;

/// Errors raised while wiring subsystems and commands into the scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Subsystem registry has no free slot.
    #[error("Subsystem registry full ({capacity} slots)")]
    RegistryFull {
        /// Registry capacity
        capacity: usize,
    },

    /// Subsystem handle was not issued by this scheduler.
    #[error("Unknown subsystem: {0}")]
    UnknownSubsystem(SubsystemId),

    /// Command handle was not issued by this scheduler.
    #[error("Unknown command: {0}")]
    UnknownCommand(CommandId),

    /// A default command must require the subsystem it is the default for.
    #[error("Default command '{command}' does not require subsystem '{subsystem}'")]
    DefaultMissingRequirement {
        /// Command name
        command: String,
        /// Subsystem name
        subsystem: &'static str,
    },
}

/// Startup errors of the robot runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Config(#[from] frc_common::config::ConfigError),

    #[error(transparent)]
    Hal(#[from] frc_common::hal::driver::HalError),
}
