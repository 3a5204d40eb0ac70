//! Hardware capability traits and error types.
//!
//! This module defines the narrow read/write surface the control unit
//! consumes:
//! - `MotorController` - smart motor controller with an attached encoder
//! - `Gyro` - heading sensor
//! - `PowerMonitor` - power distribution current/voltage readings
//! - `OperatorInput` - console axes and buttons
//! - `Telemetry` - fire-and-forget numeric publishing
//!
//! Concrete devices (vendor SDKs, simulation) implement these traits in
//! other crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for hardware operations.
///
/// Only configuration calls made at construction time can fail; the
/// per-tick read/write primitives are infallible by contract.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HalError {
    /// Device did not answer.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Device rejected a configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bus communication error.
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),
}

/// On-device position loop gains.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClosedLoopGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Feed-forward gain.
    #[serde(default)]
    pub kf: f64,
}

/// Smart motor controller with an attached position sensor.
///
/// Positions are raw sensor ticks. Percent outputs lie in `[-1, 1]`.
///
/// # Timing
///
/// Every method except the `configure_*` family is called inside a tick and
/// must not block.
pub trait MotorController {
    /// Sensor position [ticks].
    fn read_position(&self) -> f64;

    /// Motor output current [A].
    fn read_current(&self) -> f64;

    /// Motor output voltage [V].
    fn read_voltage(&self) -> f64;

    /// Applied output as a fraction of bus voltage.
    fn read_percent_output(&self) -> f64;

    /// Drive the motor open-loop.
    fn command_percent_output(&mut self, value: f64);

    /// Run the on-device position loop toward `ticks`.
    fn command_closed_loop_position(&mut self, ticks: f64);

    /// Reset the sensor reference so the current position reads zero.
    fn zero_sensor(&mut self);

    /// Forward soft limit [ticks]. The device refuses forward motion past it.
    fn configure_soft_limit(&mut self, ticks: f64) -> Result<(), HalError>;

    /// Load position loop gains.
    fn configure_closed_loop_gains(&mut self, gains: ClosedLoopGains) -> Result<(), HalError>;

    /// Enable voltage compensation at `saturation` volts, or disable with `None`.
    fn configure_voltage_compensation(&mut self, saturation: Option<f64>) -> Result<(), HalError>;

    /// Stop driving the motor.
    fn neutral(&mut self) {
        self.command_percent_output(0.0);
    }
}

/// Heading sensor.
pub trait Gyro {
    /// Accumulated heading [deg], positive clockwise, not wrapped.
    fn angle_degrees(&self) -> f64;

    /// Make the current heading read zero.
    fn reset(&mut self);
}

/// Power distribution readings.
pub trait PowerMonitor {
    /// Current drawn on a distribution channel [A].
    fn channel_current(&self, channel: u8) -> f64;

    /// Battery bus voltage [V].
    fn bus_voltage(&self) -> f64;
}

/// Operator console, polled once per tick.
pub trait OperatorInput {
    /// Axis value in `[-1, 1]`. Unknown axes read zero.
    fn axis(&self, id: u8) -> f64;

    /// Button state. Unknown buttons read released.
    fn button(&self, id: u8) -> bool;
}

/// Dashboard publishing. Fire-and-forget, no acknowledgment.
pub trait Telemetry {
    fn put_number(&mut self, key: &str, value: f64);

    fn put_number_array(&mut self, key: &str, values: &[f64]);
}

impl<T: Telemetry + ?Sized> Telemetry for Box<T> {
    fn put_number(&mut self, key: &str, value: f64) {
        (**self).put_number(key, value);
    }

    fn put_number_array(&mut self, key: &str, values: &[f64]) {
        (**self).put_number_array(key, values);
    }
}

/// Telemetry sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn put_number(&mut self, _key: &str, _value: f64) {}

    fn put_number_array(&mut self, _key: &str, _values: &[f64]) {}
}
