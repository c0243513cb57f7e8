use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::metrics::CacheMetrics;
use crate::pipeline::ingestion::SourceKey;
use crate::pipeline::processing::EnrichedTable;

/// One memoized enrichment result
#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: Arc<EnrichedTable>,
    pub computed_at: DateTime<Utc>,
}

/// Memoized enriched tables keyed by source identity.
///
/// Tables are immutable once inserted and handed out as `Arc`s, so any
/// number of readers can filter or look up concurrently. Computation for a
/// missing key happens under the write lock: one producer per key.
#[derive(Debug, Default)]
pub struct EnrichmentCache {
    entries: RwLock<HashMap<SourceKey, CachedTable>>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SourceKey) -> Option<Arc<EnrichedTable>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|cached| Arc::clone(&cached.table))
    }

    /// Return the cached table for `key`, computing it with `compute` on first use.
    pub fn get_or_insert_with<F>(&self, key: &SourceKey, compute: F) -> Arc<EnrichedTable>
    where
        F: FnOnce() -> EnrichedTable,
    {
        if let Some(table) = self.get(key) {
            CacheMetrics::record_hit();
            debug!(key = key.short(), "Enrichment cache hit");
            return table;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another producer may have filled the slot between the two locks
        if let Some(cached) = entries.get(key) {
            CacheMetrics::record_hit();
            return Arc::clone(&cached.table);
        }

        CacheMetrics::record_miss();
        debug!(key = key.short(), "Enrichment cache miss");

        let table = Arc::new(compute());
        entries.insert(
            key.clone(),
            CachedTable {
                table: Arc::clone(&table),
                computed_at: Utc::now(),
            },
        );
        CacheMetrics::record_entries(entries.len());
        table
    }

    pub fn computed_at(&self, key: &SourceKey) -> Option<DateTime<Utc>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|cached| cached.computed_at)
    }

    /// Drop one entry so the next lookup recomputes it. Returns whether it existed.
    pub fn invalidate(&self, key: &SourceKey) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let removed = entries.remove(key).is_some();
        if removed {
            CacheMetrics::record_invalidation(1);
            CacheMetrics::record_entries(entries.len());
            debug!(key = key.short(), "Enrichment cache entry invalidated");
        }
        removed
    }

    /// Drop every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let removed = entries.len();
        entries.clear();
        CacheMetrics::record_invalidation(removed);
        CacheMetrics::record_entries(0);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn key(s: &str) -> SourceKey {
        SourceKey::from_bytes(s.as_bytes())
    }

    #[test]
    fn test_computes_once_per_key() {
        let cache = EnrichmentCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            EnrichedTable::default()
        };

        let first = cache.get_or_insert_with(&key("a"), compute);
        let second = cache.get_or_insert_with(&key("a"), || unreachable!("cached"));

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.computed_at(&key("a")).is_some());
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let cache = EnrichmentCache::new();
        let first = cache.get_or_insert_with(&key("a"), EnrichedTable::default);

        assert!(cache.invalidate(&key("a")));
        assert!(!cache.invalidate(&key("a")));
        assert!(cache.get(&key("a")).is_none());

        let second = cache.get_or_insert_with(&key("a"), EnrichedTable::default);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clear() {
        let cache = EnrichmentCache::new();
        cache.get_or_insert_with(&key("a"), EnrichedTable::default);
        cache.get_or_insert_with(&key("b"), EnrichedTable::default);

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(EnrichmentCache::new());
        let table = cache.get_or_insert_with(&key("a"), EnrichedTable::default);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get(&key("a")).map(|t| t.len()))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(table.len()));
        }
    }
}
