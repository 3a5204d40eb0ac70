//! Fixed-rate tick loop.
//!
//! Sleeps to absolute deadlines (`start + k·period`) so jitter in one tick
//! does not shift the ones after it. An overrun is counted and logged, never
//! fatal; when the loop falls a whole period behind it resynchronises
//! instead of bursting through the missed ticks.
//!
//! The loop stops when the shared `running` flag is cleared (Ctrl-C) or the
//! tick budget is spent.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Ticks between periodic statistics lines.
const STATS_LOG_INTERVAL: u64 = 500;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total ticks executed.
    pub cycle_count: u64,
    /// Last tick body duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum tick body duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum tick body duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Ticks whose body outlasted the period.
    pub overruns: u64,
    /// Maximum wake-up latency [ns] (actual minus scheduled start).
    pub max_latency_ns: i64,
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record one tick. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average tick body time [ns] (0 before the first tick).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Tick pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Sleep to absolute deadlines `period` apart.
    FixedRate(Duration),
    /// Run ticks back to back (simulation faster than real time).
    Unpaced,
}

impl Pacing {
    /// Fixed rate at `hz` ticks per second.
    pub fn from_hz(hz: u32) -> Self {
        Self::FixedRate(Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1))))
    }
}

/// Drives a tick body at the configured pacing.
pub struct CycleRunner {
    pacing: Pacing,
    running: Arc<AtomicBool>,
    stats: CycleStats,
}

impl CycleRunner {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            running: Arc::new(AtomicBool::new(true)),
            stats: CycleStats::new(),
        }
    }

    /// Flag that keeps the loop alive; store `false` to stop it.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Run `body` once per tick for at most `max_ticks` ticks.
    ///
    /// `body` receives the zero-based tick index within this call. Returns
    /// the number of ticks executed, short of `max_ticks` only when stopped.
    pub fn run<F: FnMut(u64)>(&mut self, max_ticks: u64, mut body: F) -> u64 {
        let period = match self.pacing {
            Pacing::FixedRate(period) => Some(period),
            Pacing::Unpaced => None,
        };
        let period_ns = period.map_or(i64::MAX, |p| p.as_nanos() as i64);
        let mut deadline = Instant::now();

        let mut executed = 0;
        while executed < max_ticks && self.running.load(Ordering::SeqCst) {
            let start = Instant::now();
            let latency_ns = start.saturating_duration_since(deadline).as_nanos() as i64;

            body(executed);
            executed += 1;

            let duration_ns = start.elapsed().as_nanos() as i64;
            self.stats.record(duration_ns, latency_ns);
            if duration_ns > period_ns {
                self.stats.overruns += 1;
                warn!(duration_ns, budget_ns = period_ns, tick = executed, "tick overrun");
            }
            if self.stats.cycle_count % STATS_LOG_INTERVAL == 0 {
                debug!(
                    ticks = self.stats.cycle_count,
                    avg_ns = self.stats.avg_cycle_ns(),
                    max_ns = self.stats.max_cycle_ns,
                    overruns = self.stats.overruns,
                    "cycle stats"
                );
            }

            if let Some(period) = period {
                deadline += period;
                let now = Instant::now();
                if now >= deadline + period {
                    // A whole period behind: drop the missed deadlines.
                    deadline = now;
                } else if deadline > now {
                    std::thread::sleep(deadline - now);
                }
            }
        }
        executed
    }
}
