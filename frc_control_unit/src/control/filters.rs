//! Setpoint smoothing.
//!
//! Fixed-length moving average over a circular buffer. The lift inserts its
//! setpoint every tick and commands the mean, which limits how fast the
//! commanded position can jump. `fill` overwrites every slot so the average
//! carries no history across a mode switch.

/// Circular moving-average buffer of `N` samples.
///
/// Starts filled with zeros, matching a lift resting at the bottom of its
/// travel after the sensor is zeroed.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage<const N: usize> {
    samples: [f64; N],
    index: usize,
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MovingAverage<N> {
    const _NON_EMPTY: () = assert!(N > 0, "moving average needs at least one slot");

    pub const fn new() -> Self {
        let () = Self::_NON_EMPTY;
        Self {
            samples: [0.0; N],
            index: 0,
        }
    }

    /// Store `value` at the rotating index and advance it.
    #[inline]
    pub fn insert(&mut self, value: f64) {
        self.samples[self.index] = value;
        self.index = (self.index + 1) % N;
    }

    /// Arithmetic mean of all slots.
    ///
    /// A uniform window returns its sample unchanged; summing then dividing
    /// would round values like 0.1 off by an ulp.
    #[inline]
    pub fn mean(&self) -> f64 {
        let first = self.samples[0];
        if self.samples.iter().all(|&s| s == first) {
            return first;
        }
        self.samples.iter().sum::<f64>() / N as f64
    }

    /// Overwrite every slot with `value`.
    #[inline]
    pub fn fill(&mut self, value: f64) {
        self.samples = [value; N];
    }

    /// Number of slots.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        false
    }
}
