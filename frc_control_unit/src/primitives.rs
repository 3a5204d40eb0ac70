//! Closed-loop building blocks for autonomous routines.
//!
//! Each primitive updates its on-target debounce in `execute()` so that
//! `is_finished()` is a pure read, and leaves its actuator neutral (or
//! holding, for the lift) in `end()`.

pub mod drive;
pub mod intake;
pub mod lift;

pub use drive::{AngleReference, DriveDistance, TurnAngle};
pub use intake::RunIntake;
pub use lift::LiftToHeight;
