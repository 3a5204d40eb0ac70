//! Hardware abstraction boundary.
//!
//! Capability traits for motor controllers, gyros, power monitoring,
//! operator input and telemetry. The control unit depends only on these
//! traits, never on a concrete device type.

pub mod driver;
