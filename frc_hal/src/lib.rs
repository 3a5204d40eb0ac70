//! # FRC HAL Library
//!
//! Concrete implementations of the hardware capability traits defined in
//! `frc_common::hal::driver`.
//!
//! # Module Structure
//!
//! - [`drivers`] - Device drivers (currently simulation only)
//! - [`telemetry`] - Telemetry sinks (tracing, JSON lines, in-memory)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     frc_hal                              │
//! │  ┌──────────────┐   step(dt)   ┌──────────────────────┐  │
//! │  │   SimWorld   │─────────────►│ SimMotor / SimGyro / │  │
//! │  │  (physics)   │              │ SimPowerMonitor      │  │
//! │  └──────────────┘              └──────────┬───────────┘  │
//! │                                           │ shared handles│
//! │                                           ▼              │
//! │                         Box<dyn MotorController> etc.    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Simulated devices are cheap handles over shared state: the control unit
//! owns one clone through the capability trait while the world keeps
//! another to advance physics between ticks.

pub mod drivers;
pub mod telemetry;
