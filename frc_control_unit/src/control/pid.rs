//! PID controller for the autonomous drive primitives.
//!
//! Backward Euler integral with back-calculation anti-windup, raw
//! derivative on error. Zero Ki disables integral; zero Kd disables
//! derivative. The first sample after a reset seeds the derivative history
//! so a large initial error does not kick the output.

use frc_common::control_unit::config::PidConstants;

/// Tracking time constant used whenever the integral is enabled [s].
const ANTI_WINDUP_TT: f64 = 0.1;

/// Per-run controller memory. Reset on every command initialize.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidState {
    integral: f64,
    prev_error: f64,
    /// Last unsaturated output, fed back for anti-windup.
    prev_raw_output: f64,
    primed: bool,
}

impl PidState {
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Derivative of the error since the last sample, zero on the first.
    fn error_rate(&mut self, error: f64, dt: f64) -> f64 {
        let rate = if self.primed {
            (error - self.prev_error) / dt
        } else {
            0.0
        };
        self.prev_error = error;
        self.primed = true;
        rate
    }
}

/// PID gains with output saturation.
#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Anti-windup tracking time constant [s] (0 = disabled).
    pub tt: f64,
    /// Output saturation limit (percent output).
    pub out_max: f64,
}

impl PidGains {
    /// Build gains from config constants with a given output clamp.
    pub fn from_constants(constants: &PidConstants, out_max: f64) -> Self {
        Self {
            kp: constants.kp,
            ki: constants.ki,
            kd: constants.kd,
            tt: if constants.ki != 0.0 { ANTI_WINDUP_TT } else { 0.0 },
            out_max,
        }
    }

    /// Pull on the integral from the last step's saturation excess.
    fn windup_correction(&self, prev_raw_output: f64) -> f64 {
        if self.tt <= 0.0 || self.out_max <= 0.0 {
            return 0.0;
        }
        let limit = self.out_max;
        (prev_raw_output.clamp(-limit, limit) - prev_raw_output) / self.tt
    }
}

/// One controller step. Returns the unsaturated output; use
/// [`pid_compute_clamped`] when the result drives an actuator.
#[inline]
pub fn pid_compute(state: &mut PidState, gains: &PidGains, error: f64, dt: f64) -> f64 {
    if dt <= 0.0 || !error.is_finite() {
        return 0.0;
    }

    let rate = state.error_rate(error, dt);

    if gains.ki == 0.0 {
        state.integral = 0.0;
    } else {
        let correction = gains.windup_correction(state.prev_raw_output);
        state.integral += (gains.ki * error + correction) * dt;
    }

    let raw = gains.kp * error + state.integral + gains.kd * rate;
    state.prev_raw_output = raw;
    raw
}

/// [`pid_compute`] saturated to `±out_max`.
#[inline]
pub fn pid_compute_clamped(state: &mut PidState, gains: &PidGains, error: f64, dt: f64) -> f64 {
    let limit = gains.out_max.abs();
    pid_compute(state, gains, error, dt).clamp(-limit, limit)
}

// ─── Tests ──────────────────────────────────────────────────────────
