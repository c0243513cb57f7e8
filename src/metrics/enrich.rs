//! Enrichment Phase Metrics
//!
//! Batch sizes, classification counts and score spread for each pipeline run.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};
use crate::pipeline::processing::Summary;

pub struct EnrichMetrics;

impl EnrichMetrics {
    /// Histogram fed by the run's `TimingGuard`
    pub const DURATION_SECONDS: &'static str =
        phase_metric!(histogram, "enrich", "duration_seconds");

    /// Record a completed enrichment batch
    pub fn record_batch(summary: &Summary) {
        ::metrics::counter!(phase_metric!(counter, "enrich", "batches")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "enrich", "records"))
            .increment(summary.total as u64);
        ::metrics::counter!(phase_metric!(counter, "enrich", "corporate_records"))
            .increment(summary.corporate_count as u64);
        ::metrics::counter!(phase_metric!(counter, "enrich", "valid_phone_records"))
            .increment(summary.valid_phone_count as u64);
        ::metrics::histogram!(phase_metric!(histogram, "enrich", "batch_size"))
            .record(summary.total as f64);

        if let Some(average) = summary.average_score {
            ::metrics::gauge!(phase_metric!(gauge, "enrich", "average_score")).set(average);
        }
    }

    /// Record an input that failed structural validation
    pub fn record_rejected_input() {
        ::metrics::counter!(phase_metric!(counter, "enrich", "rejected_inputs")).increment(1);
    }
}

impl PhaseMetrics for EnrichMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "enrich", "batches"));
        let _ = ::metrics::counter!(phase_metric!(counter, "enrich", "records"));
        let _ = ::metrics::counter!(phase_metric!(counter, "enrich", "corporate_records"));
        let _ = ::metrics::counter!(phase_metric!(counter, "enrich", "valid_phone_records"));
        let _ = ::metrics::counter!(phase_metric!(counter, "enrich", "rejected_inputs"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "enrich", "batch_size"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "enrich", "duration_seconds"));
        let _ = ::metrics::gauge!(phase_metric!(gauge, "enrich", "average_score"));
    }

    fn phase_name() -> &'static str {
        "enrich"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "enrich", "batches"),
                metric_type: MetricType::Counter,
                help: "Enrichment runs completed",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "records"),
                metric_type: MetricType::Counter,
                help: "Prospect records enriched",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "corporate_records"),
                metric_type: MetricType::Counter,
                help: "Enriched records with a corporate email domain",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "valid_phone_records"),
                metric_type: MetricType::Counter,
                help: "Enriched records with at least 10 phone digits",
            },
            MetricDoc {
                name: phase_metric!(counter, "enrich", "rejected_inputs"),
                metric_type: MetricType::Counter,
                help: "Inputs rejected for a malformed shape",
            },
            MetricDoc {
                name: phase_metric!(histogram, "enrich", "batch_size"),
                metric_type: MetricType::Histogram,
                help: "Records per enrichment run",
            },
            MetricDoc {
                name: phase_metric!(histogram, "enrich", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of an enrichment run",
            },
            MetricDoc {
                name: phase_metric!(gauge, "enrich", "average_score"),
                metric_type: MetricType::Gauge,
                help: "Mean lead score of the last non-empty run",
            },
        ]
    }
}
