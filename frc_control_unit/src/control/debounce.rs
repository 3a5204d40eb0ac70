//! On-target debounce counter.
//!
//! Counts consecutive ticks a condition held. Updated once per `execute()`
//! so that the finish predicate of a primitive is a pure read.

/// Consecutive-tick counter with a settle threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debounce {
    held_ticks: u32,
    settle_ticks: u32,
}

impl Debounce {
    /// `settle_ticks` of zero settles on the first on-target sample.
    pub const fn new(settle_ticks: u32) -> Self {
        Self {
            held_ticks: 0,
            settle_ticks,
        }
    }

    /// Record one sample. A false sample restarts the count.
    #[inline]
    pub fn update(&mut self, condition: bool) {
        if condition {
            self.held_ticks = self.held_ticks.saturating_add(1);
        } else {
            self.held_ticks = 0;
        }
    }

    /// True once the condition has held for `settle_ticks` samples (at least one).
    #[inline]
    pub const fn is_settled(&self) -> bool {
        self.held_ticks >= self.settle_ticks && self.held_ticks > 0
    }

    #[inline]
    pub fn reset(&mut self) {
        self.held_ticks = 0;
    }

    #[inline]
    pub const fn held_ticks(&self) -> u32 {
        self.held_ticks
    }
}
