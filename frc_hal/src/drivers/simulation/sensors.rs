//! Simulated gyro and power distribution readings.

use std::cell::RefCell;
use std::rc::Rc;

use frc_common::hal::driver::{Gyro, PowerMonitor};

/// Number of power distribution channels.
pub const POWER_CHANNELS: usize = 16;

#[derive(Debug, Default)]
struct GyroState {
    angle: f64,
    offset: f64,
}

/// Heading sensor integrated by [`SimWorld`](super::SimWorld).
#[derive(Debug, Clone, Default)]
pub struct SimGyro {
    state: Rc<RefCell<GyroState>>,
}

impl SimGyro {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate the robot by `degrees`, positive clockwise.
    pub fn rotate(&self, degrees: f64) {
        self.state.borrow_mut().angle += degrees;
    }

    /// Heading ignoring resets [deg].
    pub fn true_angle(&self) -> f64 {
        self.state.borrow().angle
    }
}

impl Gyro for SimGyro {
    fn angle_degrees(&self) -> f64 {
        let s = self.state.borrow();
        s.angle - s.offset
    }

    fn reset(&mut self) {
        let mut s = self.state.borrow_mut();
        s.offset = s.angle;
    }
}

#[derive(Debug)]
struct PowerState {
    bus_voltage: f64,
    channels: [f64; POWER_CHANNELS],
}

/// Power distribution panel with settable readings.
#[derive(Debug, Clone)]
pub struct SimPowerMonitor {
    state: Rc<RefCell<PowerState>>,
}

impl SimPowerMonitor {
    pub fn new(bus_voltage: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(PowerState {
                bus_voltage,
                channels: [0.0; POWER_CHANNELS],
            })),
        }
    }

    pub fn set_bus_voltage(&self, volts: f64) {
        self.state.borrow_mut().bus_voltage = volts;
    }

    /// Out-of-range channels are ignored.
    pub fn set_channel_current(&self, channel: u8, amps: f64) {
        if let Some(slot) = self.state.borrow_mut().channels.get_mut(usize::from(channel)) {
            *slot = amps;
        }
    }

    pub fn total_current(&self) -> f64 {
        self.state.borrow().channels.iter().sum()
    }
}

impl PowerMonitor for SimPowerMonitor {
    fn channel_current(&self, channel: u8) -> f64 {
        self.state
            .borrow()
            .channels
            .get(usize::from(channel))
            .copied()
            .unwrap_or(0.0)
    }

    fn bus_voltage(&self) -> f64 {
        self.state.borrow().bus_voltage
    }
}
