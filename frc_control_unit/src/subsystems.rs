//! Robot subsystems.

pub mod drivetrain;
pub mod intake;
pub mod lift;

pub use drivetrain::Drivetrain;
pub use intake::Intake;
pub use lift::{Lift, LiftMode, LiftUnits};
