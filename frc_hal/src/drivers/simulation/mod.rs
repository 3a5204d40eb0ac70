//! Simulation driver module.
//!
//! Software devices for running the control unit without a robot.

mod input;
mod motor;
mod sensors;
mod world;

pub use input::SimOperatorInput;
pub use motor::{MotorModel, SimMotor, SimMotorMode};
pub use sensors::{SimGyro, SimPowerMonitor};
pub use world::SimWorld;
