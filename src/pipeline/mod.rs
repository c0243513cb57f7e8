// Enrichment pipeline: ingestion, processing, memoization and read-only queries

pub mod ingestion;
pub mod processing;
pub mod query;
pub mod storage;

use std::borrow::Borrow;
use std::sync::Arc;

use tracing::{info, info_span};

use crate::metrics::{time_operation, EnrichMetrics};
use crate::types::RawRecord;
use ingestion::{LoadedSource, SourceKey};
use processing::{DefaultEnricher, EnrichedTable, Enricher};
use storage::EnrichmentCache;

pub use query::{AreaCodeFilter, EmailKindFilter, FilteredView, RecordFilter};

/// Batch enrichment over whole prospect tables, with per-source memoization
pub struct Pipeline {
    enricher: Box<dyn Enricher + Send + Sync>,
    cache: EnrichmentCache,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_enricher(Box::new(DefaultEnricher::new()))
    }

    pub fn with_enricher(enricher: Box<dyn Enricher + Send + Sync>) -> Self {
        Self {
            enricher,
            cache: EnrichmentCache::new(),
        }
    }

    /// Enrich every record, preserving input order. Never cached.
    pub fn run<I>(&self, records: I) -> EnrichedTable
    where
        I: IntoIterator,
        I::Item: Borrow<RawRecord>,
    {
        let span = info_span!("enrich_batch");
        let _enter = span.enter();
        let _timing = time_operation(EnrichMetrics::DURATION_SECONDS);

        let table = EnrichedTable::new(
            records
                .into_iter()
                .map(|record| self.enricher.enrich(record.borrow()))
                .collect(),
        );

        let summary = table.summary();
        EnrichMetrics::record_batch(&summary);
        info!(
            total = summary.total,
            corporate = summary.corporate_count,
            valid_phones = summary.valid_phone_count,
            "Enrichment batch complete"
        );

        table
    }

    /// Enrich a loaded source, reusing the cached table for a known source key.
    pub fn run_source(&self, source: &LoadedSource) -> Arc<EnrichedTable> {
        self.run_cached(&source.key, &source.records)
    }

    /// Enrich `records` under an explicit cache key.
    pub fn run_cached(&self, key: &SourceKey, records: &[RawRecord]) -> Arc<EnrichedTable> {
        self.cache.get_or_insert_with(key, || self.run(records))
    }

    pub fn cache(&self) -> &EnrichmentCache {
        &self.cache
    }

    /// Forget the cached table for `key`; the next run recomputes it.
    pub fn invalidate(&self, key: &SourceKey) -> bool {
        self.cache.invalidate(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_preserves_order_and_accepts_owned_or_borrowed() {
        let pipeline = Pipeline::new();
        let records = vec![RawRecord::new("B"), RawRecord::new("A")];

        let borrowed = pipeline.run(&records);
        let owned = pipeline.run(records.clone());

        assert_eq!(borrowed, owned);
        let companies: Vec<_> = borrowed.iter().map(|r| r.company()).collect();
        assert_eq!(companies, vec![Some("B"), Some("A")]);
    }

    #[test]
    fn test_run_source_is_memoized() {
        let pipeline = Pipeline::new();
        let source =
            LoadedSource::from_records(vec![RawRecord::new("ACME").with_email("x@acme.com")]);

        let first = pipeline.run_source(&source);
        let second = pipeline.run_source(&source);
        assert!(Arc::ptr_eq(&first, &second));

        assert!(pipeline.invalidate(&source.key));
        let third = pipeline.run_source(&source);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
