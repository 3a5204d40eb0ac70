//! Simulated robot.
//!
//! Owns one handle of every simulated device and advances the physics once
//! per tick. The control unit gets the other handles through the capability
//! traits.

use frc_common::consts::NOMINAL_BUS_VOLTAGE;
use frc_common::control_unit::config::RobotConfig;
use frc_common::hal::driver::MotorController;
use tracing::debug;

use super::input::SimOperatorInput;
use super::motor::{MotorModel, SimMotor};
use super::sensors::{SimGyro, SimPowerMonitor};

/// Drive top speed [in/s].
const DRIVE_FREE_SPEED_IN_PER_S: f64 = 144.0;
/// Time for the lift to cover its full travel at full output [s].
const LIFT_FULL_TRAVEL_S: f64 = 1.5;
/// Battery internal resistance [Ω].
const BATTERY_RESISTANCE_OHM: f64 = 0.015;
/// Brownout floor for the simulated bus [V].
const MIN_BUS_VOLTAGE: f64 = 6.5;

const LEFT_DRIVE_CHANNEL: u8 = 0;
const RIGHT_DRIVE_CHANNEL: u8 = 15;
const INTAKE_CHANNEL: u8 = 5;

/// Every simulated device of the robot plus the physics that ties them together.
#[derive(Debug, Clone)]
pub struct SimWorld {
    pub left: SimMotor,
    pub right: SimMotor,
    pub lift_lead: SimMotor,
    pub lift_follower: SimMotor,
    pub intake: SimMotor,
    pub gyro: SimGyro,
    pub power: SimPowerMonitor,
    pub input: SimOperatorInput,
    ticks_per_inch: f64,
    track_width_inches: f64,
    lift_channels: [u8; 2],
    elapsed_s: f64,
}

impl SimWorld {
    pub fn new(config: &RobotConfig) -> Self {
        let drive = MotorModel {
            free_speed_ticks_per_s: DRIVE_FREE_SPEED_IN_PER_S * config.drive.ticks_per_inch,
            full_output_current: 60.0,
        };
        let lift = MotorModel {
            free_speed_ticks_per_s: config.lift.max_height_ticks / LIFT_FULL_TRAVEL_S,
            full_output_current: 30.0,
        };
        let intake = MotorModel {
            free_speed_ticks_per_s: 4096.0,
            full_output_current: 10.0,
        };

        Self {
            left: SimMotor::new("drive_left", drive, NOMINAL_BUS_VOLTAGE),
            right: SimMotor::new("drive_right", drive, NOMINAL_BUS_VOLTAGE),
            lift_lead: SimMotor::new("lift_lead", lift, NOMINAL_BUS_VOLTAGE),
            lift_follower: SimMotor::new("lift_follower", lift, NOMINAL_BUS_VOLTAGE),
            intake: SimMotor::new("intake", intake, NOMINAL_BUS_VOLTAGE),
            gyro: SimGyro::new(),
            power: SimPowerMonitor::new(NOMINAL_BUS_VOLTAGE),
            input: SimOperatorInput::new(),
            ticks_per_inch: config.drive.ticks_per_inch,
            track_width_inches: config.drive.track_width_inches,
            lift_channels: config.lift.power_channels,
            elapsed_s: 0.0,
        }
    }

    /// Advance every device by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        self.left.step(dt);
        self.right.step(dt);
        self.lift_lead.step(dt);
        self.intake.step(dt);

        // The follower is geared to the lead, turning the opposite way.
        self.lift_follower
            .set_mechanism_position(-self.lift_lead.mechanism_position());

        // Differential drive: heading rate = (v_left - v_right) / track width.
        let v_left = self.left.velocity() / self.ticks_per_inch;
        let v_right = self.right.velocity() / self.ticks_per_inch;
        let omega = (v_left - v_right) / self.track_width_inches;
        self.gyro.rotate((omega * dt).to_degrees());

        self.update_power();
        self.elapsed_s += dt;
    }

    fn update_power(&mut self) {
        let [lead_channel, follower_channel] = self.lift_channels;
        self.power
            .set_channel_current(LEFT_DRIVE_CHANNEL, self.left.read_current());
        self.power
            .set_channel_current(RIGHT_DRIVE_CHANNEL, self.right.read_current());
        self.power
            .set_channel_current(lead_channel, self.lift_lead.read_current());
        self.power
            .set_channel_current(follower_channel, self.lift_follower.read_current());
        self.power
            .set_channel_current(INTAKE_CHANNEL, self.intake.read_current());

        let bus = (NOMINAL_BUS_VOLTAGE - self.power.total_current() * BATTERY_RESISTANCE_OHM)
            .max(MIN_BUS_VOLTAGE);
        self.power.set_bus_voltage(bus);
        for motor in [
            &self.left,
            &self.right,
            &self.lift_lead,
            &self.lift_follower,
            &self.intake,
        ] {
            motor.set_bus_voltage(bus);
        }
        if bus <= MIN_BUS_VOLTAGE {
            debug!(bus, "simulated brownout");
        }
    }

    /// Simulated time since construction [s].
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Distance driven by the robot centre [in].
    pub fn drive_distance_inches(&self) -> f64 {
        (self.left.mechanism_position() + self.right.mechanism_position())
            / 2.0
            / self.ticks_per_inch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frc_common::hal::driver::{Gyro, PowerMonitor};

    const DT: f64 = 0.02;

    #[test]
    fn straight_drive_keeps_heading() {
        let mut world = SimWorld::new(&RobotConfig::default());
        let mut left = world.left.clone();
        let mut right = world.right.clone();
        left.command_percent_output(0.5);
        right.command_percent_output(0.5);
        for _ in 0..50 {
            world.step(DT);
        }
        // 0.5 * 144 in/s * 1 s
        let distance = world.drive_distance_inches();
        assert!((distance - 72.0).abs() < 1e-6, "{distance}");
        assert!(world.gyro.angle_degrees().abs() < 1e-9);
        assert!((world.elapsed_s() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn spin_turns_clockwise_when_left_leads() {
        let mut world = SimWorld::new(&RobotConfig::default());
        let mut left = world.left.clone();
        let mut right = world.right.clone();
        left.command_percent_output(0.3);
        right.command_percent_output(-0.3);
        world.step(DT);
        assert!(world.gyro.angle_degrees() > 0.0);
    }

    #[test]
    fn lift_current_reaches_power_monitor() {
        let mut world = SimWorld::new(&RobotConfig::default());
        let mut lead = world.lift_lead.clone();
        lead.command_percent_output(1.0);
        world.step(DT);
        let [lead_channel, _] = RobotConfig::default().lift.power_channels;
        assert!(world.power.channel_current(lead_channel) > 0.0);
        assert!(world.power.bus_voltage() < NOMINAL_BUS_VOLTAGE);
        assert!(world.lift_follower.mechanism_position() < 0.0);
    }
}
