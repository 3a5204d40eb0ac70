//! Autonomous routines.
//!
//! Every routine is a [`CommandGroup`] tree of primitives. Field distances,
//! turn angles and lift heights come from `[auto]` in the config.

use frc_common::control_unit::config::{AutoRoutine, RobotConfig};

use crate::command::CommandGroup;
use crate::primitives::{DriveDistance, LiftToHeight, RunIntake, TurnAngle};
use crate::robot::Robot;
use crate::subsystem::Subsystem;

/// Build the group for `routine`. `None` for [`AutoRoutine::None`].
pub fn build(routine: AutoRoutine, robot: &Robot, config: &RobotConfig) -> Option<CommandGroup<Robot>> {
    match routine {
        AutoRoutine::None => None,
        AutoRoutine::DriveToSwitch => Some(drive_to_switch(robot, config)),
        AutoRoutine::LeftUnownedScale => Some(left_unowned_scale(robot, config)),
        AutoRoutine::ScaleWithParallelLift => Some(scale_with_parallel_lift(robot, config)),
    }
}

/// Cross the auto line by driving up to the switch.
pub fn drive_to_switch(robot: &Robot, config: &RobotConfig) -> CommandGroup<Robot> {
    let drive = robot.drivetrain.id();
    CommandGroup::builder(AutoRoutine::DriveToSwitch.as_str())
        .sequential(DriveDistance::new(drive, config.auto.back_wall_to_switch, &config.drive))
        .build()
}

/// Start on the left, cross behind the switch and score on the far scale.
pub fn left_unowned_scale(robot: &Robot, config: &RobotConfig) -> CommandGroup<Robot> {
    let drive = robot.drivetrain.id();
    let auto = &config.auto;
    CommandGroup::builder(AutoRoutine::LeftUnownedScale.as_str())
        .sequential(DriveDistance::new(drive, auto.back_wall_to_platform_zone, &config.drive))
        .sequential(TurnAngle::relative(drive, auto.long_right_turn, &config.drive))
        .sequential(DriveDistance::new(drive, auto.through_platform_zone, &config.drive))
        .sequential(TurnAngle::relative(drive, auto.long_left_turn, &config.drive))
        .sequential(DriveDistance::new(drive, auto.platform_to_scale, &config.drive))
        .sequential(LiftToHeight::new(robot.lift.id(), auto.scale_height, &config.lift))
        .sequential(RunIntake::eject(robot.intake.id(), &config.intake))
        .build()
}

/// Same path as [`left_unowned_scale`], raising the lift during the last leg.
pub fn scale_with_parallel_lift(robot: &Robot, config: &RobotConfig) -> CommandGroup<Robot> {
    let drive = robot.drivetrain.id();
    let auto = &config.auto;
    let approach = CommandGroup::builder("approach_scale")
        .parallel(LiftToHeight::new(robot.lift.id(), auto.scale_height, &config.lift))
        .sequential(DriveDistance::new(drive, auto.platform_to_scale, &config.drive))
        .build();

    CommandGroup::builder(AutoRoutine::ScaleWithParallelLift.as_str())
        .sequential(DriveDistance::new(drive, auto.back_wall_to_platform_zone, &config.drive))
        .sequential(TurnAngle::relative(drive, auto.long_right_turn, &config.drive))
        .sequential(DriveDistance::new(drive, auto.through_platform_zone, &config.drive))
        .sequential(TurnAngle::relative(drive, auto.long_left_turn, &config.drive))
        .sequential(approach)
        .sequential(RunIntake::eject(robot.intake.id(), &config.intake))
        .build()
}
