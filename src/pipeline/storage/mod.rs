// Pipeline storage: in-memory memoization of enriched tables

pub mod in_memory;

pub use in_memory::{CachedTable, EnrichmentCache};
