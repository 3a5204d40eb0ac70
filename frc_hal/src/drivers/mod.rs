//! HAL driver implementations.
//!
//! - [`simulation`] - Software simulation for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the capability traits from `frc_common::hal::driver`
//! 3. Export the device types from this module

pub mod simulation;
