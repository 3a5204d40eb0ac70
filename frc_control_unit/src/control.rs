//! Control engine root.
//!
//! Command-side PID, the lift setpoint smoothing buffer, and the on-target
//! debounce counter shared by the closed-loop primitives.

pub mod debounce;
pub mod filters;
pub mod pid;
