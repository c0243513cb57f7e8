// Pipeline processing: normalization, lead scoring, enrichment and aggregation

pub mod aggregate;
pub mod enrich;
pub mod normalize;
pub mod quality_gate;

pub use aggregate::Summary;
pub use enrich::{DefaultEnricher, EnrichedRecord, EnrichedTable, Enricher};
