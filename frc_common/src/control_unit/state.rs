//! Operating mode enum for the robot lifecycle.
//!
//! The host runtime selects exactly one mode at a time. The control unit
//! never assumes which one is active; it only reacts to mode-init hooks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Robot operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RobotMode {
    /// Outputs inhibited; initial mode after boot.
    #[default]
    Disabled = 0,
    /// Pre-programmed routine running.
    Autonomous = 1,
    /// Operator driving.
    Teleop = 2,
    /// Hardware checkout; the scheduler does not run.
    Test = 3,
}

impl RobotMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Disabled),
            1 => Some(Self::Autonomous),
            2 => Some(Self::Teleop),
            3 => Some(Self::Test),
            _ => None,
        }
    }

    /// Whether the command scheduler is driven in this mode.
    #[inline]
    pub const fn runs_scheduler(self) -> bool {
        matches!(self, Self::Autonomous | Self::Teleop)
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disabled => "disabled",
            Self::Autonomous => "autonomous",
            Self::Teleop => "teleop",
            Self::Test => "test",
        };
        f.write_str(name)
    }
}
