//! FRC Common Library
//!
//! Shared vocabulary for every crate in the robot workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Fixed inventory limits and timing defaults
//! - [`config`] - Configuration loading traits and types
//! - [`control_unit`] - Robot configuration, mode enum and fault flags
//! - [`hal`] - Hardware capability traits consumed by the control unit
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use frc_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod hal;
pub mod prelude;
