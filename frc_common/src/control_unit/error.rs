//! Fault bitflag types for the control unit.
//!
//! Nothing inside a tick is fatal. Anomalies are accumulated as flags and
//! published to telemetry so the operator can see them.

use bitflags::bitflags;

bitflags! {
    /// Scheduler faults observed during one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SchedulerFault: u8 {
        /// Pending queue was full; a schedule request was dropped.
        const QUEUE_FULL      = 0x01;
        /// A command lost arbitration to a non-interruptible owner.
        const REJECTED        = 0x02;
        /// A schedule or cancel request named an unregistered command.
        const UNKNOWN_COMMAND = 0x04;
    }
}

impl Default for SchedulerFault {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Lift controller faults.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LiftFault: u8 {
        /// A setpoint outside the travel range was clamped.
        const SETPOINT_CLAMPED   = 0x01;
        /// A non-finite setpoint was ignored.
        const SETPOINT_INVALID   = 0x02;
        /// A derived telemetry value was non-finite and replaced.
        const TELEMETRY_FALLBACK = 0x04;
    }
}

impl Default for LiftFault {
    fn default() -> Self {
        Self::empty()
    }
}

/// Replace a non-finite value with `fallback`.
#[inline]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
