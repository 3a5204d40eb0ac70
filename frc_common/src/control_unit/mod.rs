//! Control unit shared types.
//!
//! Types shared between the control unit and the rest of the workspace:
//! configuration structures, the robot operating mode and fault flags.

pub mod config;
pub mod error;
pub mod state;
