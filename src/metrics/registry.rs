//! Registration of every phase's metrics, with duplicate-name detection

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::metrics::{CacheMetrics, EnrichMetrics, MetricDoc, PhaseMetrics};

/// Set to any value to log the full metric catalogue at startup
pub const CATALOGUE_ENV_VAR: &str = "LEAD_METRICS_DEBUG";

const NAME_PREFIX: &str = "lead_";

/// Documented metrics keyed by name, plus any names claimed twice
#[derive(Debug, Default)]
pub struct MetricCatalogue {
    pub metrics: BTreeMap<&'static str, MetricDoc>,
    pub conflicts: Vec<&'static str>,
}

impl MetricCatalogue {
    fn add_phase<T: PhaseMetrics>(&mut self) {
        T::register_metrics();
        let docs = T::metrics_documentation();
        debug!(phase = T::phase_name(), metrics = docs.len(), "Registering phase metrics");

        for doc in docs {
            if self.metrics.contains_key(doc.name) {
                warn!(metric = doc.name, phase = T::phase_name(), "Metric name registered twice");
                self.conflicts.push(doc.name);
            } else {
                self.metrics.insert(doc.name, doc);
            }
        }
    }

    /// Metric names grouped under the phase segment of their name
    pub fn by_phase(&self) -> BTreeMap<&'static str, Vec<&MetricDoc>> {
        let mut grouped: BTreeMap<&'static str, Vec<&MetricDoc>> = BTreeMap::new();
        for doc in self.metrics.values() {
            grouped.entry(phase_of(doc.name)).or_default().push(doc);
        }
        grouped
    }
}

pub fn collect_catalogue() -> MetricCatalogue {
    let mut catalogue = MetricCatalogue::default();
    catalogue.add_phase::<EnrichMetrics>();
    catalogue.add_phase::<CacheMetrics>();
    catalogue
}

pub fn register_all_metrics() {
    let catalogue = collect_catalogue();
    info!(metrics = catalogue.metrics.len(), "Metrics registered");

    if std::env::var_os(CATALOGUE_ENV_VAR).is_some() {
        log_catalogue(&catalogue);
    }
}

fn log_catalogue(catalogue: &MetricCatalogue) {
    for (phase, docs) in catalogue.by_phase() {
        info!(phase, metrics = docs.len(), "Metric phase");
        for doc in docs {
            info!(metric = doc.name, kind = ?doc.metric_type, "{}", doc.help);
        }
    }
}

/// `lead_cache_hits_total` -> `cache`
fn phase_of(name: &str) -> &str {
    name.strip_prefix(NAME_PREFIX)
        .and_then(|rest| rest.split_once('_'))
        .map_or("unknown", |(phase, _)| phase)
}
