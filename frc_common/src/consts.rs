//! System-wide constants for the robot workspace.
//!
//! Single source of truth for inventory limits and timing defaults.

use static_assertions::const_assert;

/// Maximum number of subsystems in the registry.
///
/// Requirement sets are `u32` bitmasks, so this cannot exceed 32.
pub const MAX_SUBSYSTEMS: usize = 32;

/// Maximum number of commands that can be queued or running at once.
pub const MAX_ACTIVE_COMMANDS: usize = 64;

/// Length of the lift setpoint smoothing window [ticks].
pub const LIFT_FILTER_LEN: usize = 20;

/// Default periodic tick rate [Hz].
pub const TICK_RATE_HZ: u32 = 50;

/// Minimum accepted tick rate [Hz].
pub const TICK_RATE_HZ_MIN: u32 = 10;

/// Maximum accepted tick rate [Hz].
pub const TICK_RATE_HZ_MAX: u32 = 1000;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/robot.toml";

/// Nominal battery bus voltage [V].
pub const NOMINAL_BUS_VOLTAGE: f64 = 12.0;

const_assert!(MAX_SUBSYSTEMS <= 32);
const_assert!(LIFT_FILTER_LEN > 0);
const_assert!(TICK_RATE_HZ >= TICK_RATE_HZ_MIN && TICK_RATE_HZ <= TICK_RATE_HZ_MAX);
