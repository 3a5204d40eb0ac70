//! Simulated smart motor controller.
//!
//! First-order model: shaft velocity is proportional to applied output, no
//! inertia. The on-device position loop is proportional only, in the
//! controller's native units (output 1023 = full scale per tick of error).
//! The forward soft limit is enforced here, at the driver boundary.

use std::cell::RefCell;
use std::rc::Rc;

use frc_common::hal::driver::{ClosedLoopGains, HalError, MotorController};
use tracing::{debug, trace};

/// Full-scale output in native controller units.
const NATIVE_FULL_SCALE: f64 = 1023.0;

/// Active control request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimMotorMode {
    /// Open-loop fraction of bus voltage.
    Percent(f64),
    /// Position loop target [sensor ticks].
    Position(f64),
}

/// Physical parameters of a simulated motor and its mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorModel {
    /// Sensor speed at full output [ticks/s].
    pub free_speed_ticks_per_s: f64,
    /// Current draw at full output [A].
    pub full_output_current: f64,
}

#[derive(Debug)]
struct MotorState {
    mode: SimMotorMode,
    /// Raw mechanism position [ticks].
    position: f64,
    /// Sensor reading = position - offset.
    sensor_offset: f64,
    velocity: f64,
    applied: f64,
    soft_limit: Option<f64>,
    gains: ClosedLoopGains,
    voltage_compensation: Option<f64>,
    bus_voltage: f64,
    connected: bool,
}

impl MotorState {
    fn sensor_position(&self) -> f64 {
        self.position - self.sensor_offset
    }

    /// Output the controller would apply right now.
    fn demand(&self) -> f64 {
        let requested = match self.mode {
            SimMotorMode::Percent(value) => value,
            SimMotorMode::Position(target) => {
                self.gains.kp * (target - self.sensor_position()) / NATIVE_FULL_SCALE
            }
        };
        let mut output = if requested.is_finite() { requested } else { 0.0 };
        if let Some(saturation) = self.voltage_compensation {
            if self.bus_voltage > 0.0 {
                output *= saturation / self.bus_voltage;
            }
        }
        output = output.clamp(-1.0, 1.0);
        if let Some(limit) = self.soft_limit {
            if output > 0.0 && self.sensor_position() >= limit {
                output = 0.0;
            }
        }
        output
    }

    fn refresh(&mut self) {
        self.applied = self.demand();
    }
}

/// Shared-state handle to one simulated motor controller.
///
/// Clones refer to the same device.
#[derive(Debug, Clone)]
pub struct SimMotor {
    name: &'static str,
    model: MotorModel,
    state: Rc<RefCell<MotorState>>,
}

impl SimMotor {
    pub fn new(name: &'static str, model: MotorModel, bus_voltage: f64) -> Self {
        Self {
            name,
            model,
            state: Rc::new(RefCell::new(MotorState {
                mode: SimMotorMode::Percent(0.0),
                position: 0.0,
                sensor_offset: 0.0,
                velocity: 0.0,
                applied: 0.0,
                soft_limit: None,
                gains: ClosedLoopGains::default(),
                voltage_compensation: None,
                bus_voltage,
                connected: true,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Advance the mechanism by `dt` seconds.
    pub fn step(&self, dt: f64) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.refresh();
        s.velocity = s.applied * self.model.free_speed_ticks_per_s;
        s.position += s.velocity * dt;
        if let Some(limit) = s.soft_limit {
            // Stop at the limit, never past it.
            let max_position = limit + s.sensor_offset;
            if s.position > max_position && s.velocity > 0.0 {
                s.position = max_position;
                s.velocity = 0.0;
            }
        }
        s.refresh();
        trace!(motor = self.name, position = s.position, applied = s.applied, "motor step");
    }

    pub fn mode(&self) -> SimMotorMode {
        self.state.borrow().mode
    }

    /// Raw mechanism position, independent of sensor zeroing [ticks].
    pub fn mechanism_position(&self) -> f64 {
        self.state.borrow().position
    }

    /// Force the mechanism position [ticks].
    pub fn set_mechanism_position(&self, ticks: f64) {
        let mut s = self.state.borrow_mut();
        s.position = ticks;
        s.refresh();
    }

    /// Velocity on the last step [ticks/s].
    pub fn velocity(&self) -> f64 {
        self.state.borrow().velocity
    }

    pub fn soft_limit(&self) -> Option<f64> {
        self.state.borrow().soft_limit
    }

    pub fn gains(&self) -> ClosedLoopGains {
        self.state.borrow().gains
    }

    pub fn voltage_compensation(&self) -> Option<f64> {
        self.state.borrow().voltage_compensation
    }

    pub fn set_bus_voltage(&self, volts: f64) {
        let mut s = self.state.borrow_mut();
        s.bus_voltage = volts;
        s.refresh();
    }

    /// A disconnected controller rejects configuration calls.
    pub fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    fn check_connected(&self) -> Result<(), HalError> {
        if self.state.borrow().connected {
            Ok(())
        } else {
            Err(HalError::DeviceNotFound(self.name.to_string()))
        }
    }
}

impl MotorController for SimMotor {
    fn read_position(&self) -> f64 {
        self.state.borrow().sensor_position()
    }

    fn read_current(&self) -> f64 {
        self.state.borrow().applied.abs() * self.model.full_output_current
    }

    fn read_voltage(&self) -> f64 {
        let s = self.state.borrow();
        s.applied * s.bus_voltage
    }

    fn read_percent_output(&self) -> f64 {
        self.state.borrow().applied
    }

    fn command_percent_output(&mut self, value: f64) {
        let mut s = self.state.borrow_mut();
        s.mode = SimMotorMode::Percent(value);
        s.refresh();
    }

    fn command_closed_loop_position(&mut self, ticks: f64) {
        let mut s = self.state.borrow_mut();
        s.mode = SimMotorMode::Position(ticks);
        s.refresh();
    }

    fn zero_sensor(&mut self) {
        let mut guard = self.state.borrow_mut();
        let s = &mut *guard;
        s.sensor_offset = s.position;
        s.refresh();
    }

    fn configure_soft_limit(&mut self, ticks: f64) -> Result<(), HalError> {
        self.check_connected()?;
        if !ticks.is_finite() {
            return Err(HalError::ConfigError(format!(
                "{}: soft limit must be finite",
                self.name
            )));
        }
        self.state.borrow_mut().soft_limit = Some(ticks);
        debug!(motor = self.name, ticks, "forward soft limit configured");
        Ok(())
    }

    fn configure_closed_loop_gains(&mut self, gains: ClosedLoopGains) -> Result<(), HalError> {
        self.check_connected()?;
        self.state.borrow_mut().gains = gains;
        Ok(())
    }

    fn configure_voltage_compensation(&mut self, saturation: Option<f64>) -> Result<(), HalError> {
        self.check_connected()?;
        if saturation.is_some_and(|v| !(v.is_finite() && v > 0.0)) {
            return Err(HalError::ConfigError(format!(
                "{}: voltage saturation must be positive",
                self.name
            )));
        }
        let mut s = self.state.borrow_mut();
        s.voltage_compensation = saturation;
        s.refresh();
        Ok(())
    }
}
