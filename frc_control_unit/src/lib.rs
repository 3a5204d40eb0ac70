//! # FRC Control Unit Library
//!
//! Cooperative command scheduler and subsystem arbitration for a
//! single-robot, single-operator FRC robot, with a closed-loop lift height
//! controller and the commands that drive it.
//!
//! ## Architecture Levels
//!
//! 1. **RobotMode**: Disabled / Autonomous / Teleop / Test lifecycle
//! 2. **Scheduler**: one owner per subsystem, one coordination pass per tick
//! 3. **CommandGroup**: sequential and parallel composition of commands
//! 4. **Command**: primitives (drive, turn, lift, intake) and teleop defaults
//! 5. **Subsystem**: drivetrain, lift, intake; periodic hook every tick
//!
//! ## Single-Threaded Tick
//!
//! Everything runs on the tick thread. No callback blocks or sleeps; the
//! only sleep is the cycle runner waiting for the next deadline. Hardware is
//! reached through the capability traits in `frc_common::hal::driver`.

pub mod auto;
pub mod bindings;
pub mod command;
pub mod control;
pub mod cycle;
pub mod error;
pub mod lifecycle;
pub mod primitives;
pub mod robot;
pub mod scheduler;
pub mod subsystem;
pub mod subsystems;
pub mod teleop;
