//! Subsystem identity and the base subsystem contract.
//!
//! A subsystem is a hardware-owning unit registered once at startup. The
//! scheduler tracks which command owns it through its [`SubsystemId`];
//! the subsystem itself never holds a reference to a command.

use std::fmt;

use bitflags::bitflags;
use frc_common::consts::MAX_SUBSYSTEMS;
use frc_common::hal::driver::Telemetry;
use static_assertions::const_assert;

// One bit per registry slot.
const_assert!(MAX_SUBSYSTEMS <= u32::BITS as usize);

/// Stable handle of a registered subsystem (index into the registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsystemId(u8);

impl SubsystemId {
    /// Build a handle from a registry index. Returns `None` past the registry size.
    #[inline]
    pub const fn new(index: usize) -> Option<Self> {
        if index < MAX_SUBSYSTEMS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subsystem#{}", self.0)
    }
}

bitflags! {
    /// Set of subsystems, one bit per registry slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubsystemSet: u32 {
        const _ = !0;
    }
}

impl Default for SubsystemSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl SubsystemSet {
    /// Set holding exactly one subsystem.
    #[inline]
    pub const fn of(id: SubsystemId) -> Self {
        Self::from_bits_retain(1 << id.0)
    }

    /// Add one subsystem, builder style.
    #[inline]
    #[must_use]
    pub const fn with(self, id: SubsystemId) -> Self {
        Self::from_bits_retain(self.bits() | (1 << id.0))
    }

    #[inline]
    pub const fn contains_id(self, id: SubsystemId) -> bool {
        self.bits() & (1 << id.0) != 0
    }

    /// Member handles in ascending registry order.
    pub fn ids(self) -> impl Iterator<Item = SubsystemId> {
        (0..MAX_SUBSYSTEMS as u8)
            .filter(move |i| self.bits() & (1 << i) != 0)
            .map(SubsystemId)
    }
}

impl From<SubsystemId> for SubsystemSet {
    fn from(id: SubsystemId) -> Self {
        Self::of(id)
    }
}

/// Hardware-owning unit driven by the periodic tick.
///
/// `periodic` runs every tick in every enabled mode, independent of which
/// command currently owns the subsystem. It refreshes sensor state and
/// closed-loop outputs and publishes telemetry.
pub trait Subsystem {
    fn id(&self) -> SubsystemId;

    fn name(&self) -> &'static str;

    fn periodic(&mut self, _telemetry: &mut dyn Telemetry) {}
}
