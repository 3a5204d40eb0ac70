//! Prelude module for common re-exports.
//!
//! ```rust
//! use frc_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig, Validate};
pub use crate::control_unit::config::{AutoRoutine, RobotConfig};

// ─── Lifecycle ──────────────────────────────────────────────────────
pub use crate::control_unit::state::RobotMode;

// ─── Faults ─────────────────────────────────────────────────────────
pub use crate::control_unit::error::{LiftFault, SchedulerFault, finite_or};

// ─── Hardware Boundary ──────────────────────────────────────────────
pub use crate::hal::driver::{
    ClosedLoopGains, Gyro, HalError, MotorController, OperatorInput, PowerMonitor, Telemetry,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{MAX_ACTIVE_COMMANDS, MAX_SUBSYSTEMS, TICK_RATE_HZ};

/// Default tick period as Duration.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(1000 / TICK_RATE_HZ as u64);
