//! Prospect list enrichment and lead scoring.
//!
//! Raw prospect rows (company, contact, email, phones) go through a pure
//! batch pipeline that derives a cleaned phone number, the DDD area code,
//! the email domain, a corporate/free-email flag and a 0-2 lead score.
//! Display layers consume the enriched table through read-only filters,
//! detail lookups and aggregate metrics.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod types;

pub use error::{EnricherError, Result};
pub use pipeline::ingestion::{InputFormat, LoadOptions, LoadedSource, SourceKey};
pub use pipeline::processing::{EnrichedRecord, EnrichedTable, Summary};
pub use pipeline::{AreaCodeFilter, EmailKindFilter, FilteredView, Pipeline, RecordFilter};
pub use types::RawRecord;
