//! Centralized metrics for the enrichment pipeline
//!
//! Each pipeline phase defines its own metrics in a dedicated submodule so
//! naming stays consistent and conflicts are caught at registration time.
//! Only the `metrics` facade is used; without an installed recorder every
//! call is a no-op, which keeps the library free of any exporter.

pub mod cache;
pub mod core;
pub mod enrich;
pub mod registry;

pub use cache::CacheMetrics;
pub use self::core::{time_operation, TimingGuard};
pub use enrich::EnrichMetrics;

use std::sync::Once;

static INIT: Once = Once::new();

/// Register every phase's metrics with whatever recorder is installed.
///
/// Idempotent.
pub fn init_metrics() {
    INIT.call_once(registry::register_all_metrics);
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Register all metrics for this phase
    fn register_metrics();

    /// Phase name used in metric prefixes
    fn phase_name() -> &'static str;

    /// Documentation for all metrics in this phase
    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Build a phase-scoped metric name:
/// lead_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("lead_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("lead_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("lead_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
