//! In-memory IP to location cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::types::GeoRecord;

/// Process-lifetime memo of IP lookups.
///
/// Created once at startup and handed to every resolver; clones share the same
/// map. Entries are never expired or evicted.
///
/// The lock is only held for the duration of a single map operation and never
/// across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct GeoCache {
    entries: Arc<RwLock<HashMap<String, GeoRecord>>>,
}

impl GeoCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached record for `ip`, if any.
    pub fn lookup(&self, ip: &str) -> Option<GeoRecord> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ip)
            .cloned()
    }

    /// Inserts or overwrites the record for `ip`. Last write wins.
    pub fn store(&self, ip: impl Into<String>, record: GeoRecord) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ip.into(), record);
    }

    /// Number of cached addresses.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lon: f64) -> GeoRecord {
        GeoRecord {
            lat,
            lon,
            country: None,
            city: None,
        }
    }

    #[test]
    fn test_lookup_miss_on_empty_cache() {
        let cache = GeoCache::new();
        assert!(cache.lookup("1.1.1.1").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_store_then_lookup() {
        let cache = GeoCache::new();
        cache.store("1.1.1.1", record(-33.494, 143.2104));
        assert_eq!(cache.lookup("1.1.1.1"), Some(record(-33.494, 143.2104)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_store_overwrites_existing_entry() {
        let cache = GeoCache::new();
        cache.store("1.1.1.1", record(1.0, 2.0));
        cache.store("1.1.1.1", record(3.0, 4.0));
        assert_eq!(cache.lookup("1.1.1.1"), Some(record(3.0, 4.0)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = GeoCache::new();
        let handle = cache.clone();
        handle.store("9.9.9.9", record(47.0, 8.0));
        assert_eq!(cache.lookup("9.9.9.9"), Some(record(47.0, 8.0)));
    }

    #[test]
    fn test_separate_caches_are_isolated() {
        let a = GeoCache::new();
        let b = GeoCache::new();
        a.store("9.9.9.9", record(47.0, 8.0));
        assert!(b.lookup("9.9.9.9").is_none());
    }
}
