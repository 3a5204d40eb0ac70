//! Robot context handed to every command.
//!
//! Holds the three subsystems plus the operator console and the telemetry
//! sink. Commands reach hardware only through the subsystem they required.

use frc_common::control_unit::config::RobotConfig;
use frc_common::hal::driver::{Gyro, MotorController, OperatorInput, PowerMonitor, Telemetry};
use frc_hal::drivers::simulation::SimWorld;
use tracing::info;

use crate::error::RuntimeError;
use crate::scheduler::Scheduler;
use crate::subsystem::Subsystem;
use crate::subsystems::{Drivetrain, Intake, Lift};

/// Device handles the robot is built from.
pub struct RobotHardware {
    pub left_drive: Box<dyn MotorController>,
    pub right_drive: Box<dyn MotorController>,
    pub lift_lead: Box<dyn MotorController>,
    pub lift_follower: Box<dyn MotorController>,
    pub intake: Box<dyn MotorController>,
    pub gyro: Box<dyn Gyro>,
    pub power: Box<dyn PowerMonitor>,
    pub input: Box<dyn OperatorInput>,
    pub telemetry: Box<dyn Telemetry>,
}

impl RobotHardware {
    /// Handles onto the devices of a simulated world.
    pub fn simulated(world: &SimWorld, telemetry: Box<dyn Telemetry>) -> Self {
        Self {
            left_drive: Box::new(world.left.clone()),
            right_drive: Box::new(world.right.clone()),
            lift_lead: Box::new(world.lift_lead.clone()),
            lift_follower: Box::new(world.lift_follower.clone()),
            intake: Box::new(world.intake.clone()),
            gyro: Box::new(world.gyro.clone()),
            power: Box::new(world.power.clone()),
            input: Box::new(world.input.clone()),
            telemetry,
        }
    }
}

pub struct Robot {
    pub drivetrain: Drivetrain,
    pub lift: Lift,
    pub intake: Intake,
    pub input: Box<dyn OperatorInput>,
    telemetry: Box<dyn Telemetry>,
    tick_period_s: f64,
}

impl Robot {
    /// Register the subsystems with `scheduler` and configure the hardware.
    pub fn new(
        hardware: RobotHardware,
        config: &RobotConfig,
        scheduler: &mut Scheduler<Robot>,
    ) -> Result<Self, RuntimeError> {
        let drive_id = scheduler.register_subsystem("drivetrain")?;
        let lift_id = scheduler.register_subsystem("lift")?;
        let intake_id = scheduler.register_subsystem("intake")?;

        let drivetrain = Drivetrain::new(
            drive_id,
            hardware.left_drive,
            hardware.right_drive,
            hardware.gyro,
            &config.drive,
        );
        let lift = Lift::new(
            lift_id,
            hardware.lift_lead,
            hardware.lift_follower,
            hardware.power,
            &config.lift,
        )?;
        let intake = Intake::new(intake_id, hardware.intake);

        info!(
            subsystems = scheduler.subsystem_count(),
            tick_rate_hz = config.tick_rate_hz,
            "robot initialized"
        );

        Ok(Self {
            drivetrain,
            lift,
            intake,
            input: hardware.input,
            telemetry: hardware.telemetry,
            tick_period_s: config.tick_period_s(),
        })
    }

    /// Periodic hook of every subsystem, independent of command ownership.
    pub fn periodic(&mut self) {
        let telemetry = self.telemetry.as_mut();
        self.drivetrain.periodic(telemetry);
        self.lift.periodic(telemetry);
        self.intake.periodic(telemetry);
    }

    /// Neutral output on every open-loop actuator.
    pub fn stop_all(&mut self) {
        self.drivetrain.stop();
        self.intake.stop();
        self.lift.set_manual_output(0.0);
    }

    pub fn telemetry(&mut self) -> &mut dyn Telemetry {
        self.telemetry.as_mut()
    }

    /// Nominal time between ticks [s].
    pub fn tick_period_s(&self) -> f64 {
        self.tick_period_s
    }
}
