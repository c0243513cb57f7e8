//! Timing helpers shared by the phase metrics

use std::time::{Duration, Instant};

/// A timing guard that records its lifetime into a histogram when dropped
pub struct TimingGuard {
    start: Instant,
    histogram_name: &'static str,
}

impl TimingGuard {
    pub fn new(histogram_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            histogram_name,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finish the timing early; recording happens in `Drop`
    pub fn finish(self) {}
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        ::metrics::histogram!(self.histogram_name).record(self.start.elapsed().as_secs_f64());
    }
}

/// Usage:
/// ```rust
/// let _timing = lead_enricher::metrics::time_operation("lead_enrich_duration_seconds");
/// // ... do work ...
/// ```
pub fn time_operation(histogram_name: &'static str) -> TimingGuard {
    TimingGuard::new(histogram_name)
}
