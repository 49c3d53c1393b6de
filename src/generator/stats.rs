//! Generation run statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::graph::ResolveStats;

/// Statistics collected during one generation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generator combos resolved without error.
    pub roots_processed: u32,

    /// Generator combos aborted by an error.
    pub roots_failed: u32,

    /// Distinct variants in the report.
    pub variants: u32,

    /// Variants found again from another root and merged.
    pub merges: u32,

    /// Downward resolver counters.
    pub resolve: ResolveStats,

    /// Total time spent generating (microseconds).
    pub time_us: u64,
}

impl GenerationStats {
    /// Create new empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the final variant count and elapsed time, saturating at the
    /// field widths.
    pub fn finish(&mut self, variants: usize, elapsed: Duration) {
        self.variants = u32::try_from(variants).unwrap_or(u32::MAX);
        self.time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    }

    /// Calculate variants per second.
    #[must_use]
    pub fn variants_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.variants) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Share of roots that failed.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        let roots = f64::from(self.roots_processed) + f64::from(self.roots_failed);
        if roots == 0.0 {
            0.0
        } else {
            f64::from(self.roots_failed) / roots
        }
    }
}
