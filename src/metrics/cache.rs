//! Cache Phase Metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct CacheMetrics;

impl CacheMetrics {
    pub fn record_hit() {
        ::metrics::counter!(phase_metric!(counter, "cache", "hits")).increment(1);
    }

    pub fn record_miss() {
        ::metrics::counter!(phase_metric!(counter, "cache", "misses")).increment(1);
    }

    pub fn record_invalidation(entries_removed: usize) {
        ::metrics::counter!(phase_metric!(counter, "cache", "invalidations"))
            .increment(entries_removed as u64);
    }

    pub fn record_entries(entries: usize) {
        ::metrics::gauge!(phase_metric!(gauge, "cache", "entries")).set(entries as f64);
    }
}

impl PhaseMetrics for CacheMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "cache", "hits"));
        let _ = ::metrics::counter!(phase_metric!(counter, "cache", "misses"));
        let _ = ::metrics::counter!(phase_metric!(counter, "cache", "invalidations"));
        let _ = ::metrics::gauge!(phase_metric!(gauge, "cache", "entries"));
    }

    fn phase_name() -> &'static str {
        "cache"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "cache", "hits"),
                metric_type: MetricType::Counter,
                help: "Enriched tables served from the cache",
            },
            MetricDoc {
                name: phase_metric!(counter, "cache", "misses"),
                metric_type: MetricType::Counter,
                help: "Enriched tables computed on demand",
            },
            MetricDoc {
                name: phase_metric!(counter, "cache", "invalidations"),
                metric_type: MetricType::Counter,
                help: "Cached tables dropped by invalidate/clear",
            },
            MetricDoc {
                name: phase_metric!(gauge, "cache", "entries"),
                metric_type: MetricType::Gauge,
                help: "Tables currently cached",
            },
        ]
    }
}
