//! # Remote ephemeris cache
//!
//! Time-bounded memoization of parsed Horizons answers, keyed by
//! (`remote id`, minute timestamp, observer code). It only exists to save latency
//! and respect the rate limit of the remote service: entries expire lazily on read
//! once their age reaches the TTL, and nothing is ever evicted by size (the key
//! space is bounded by the number of bodies times the requested instants).
//!
//! The cache is internally synchronized so the per-body resolutions of one request
//! can share it while running concurrently.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use hifitime::{Duration, Epoch};

use crate::horizons::HorizonsRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub remote_id: i32,
    /// `YYYY-MM-DD HH:MM`, UTC
    pub timestamp: String,
    pub observer_code: String,
}

impl CacheKey {
    pub fn new(remote_id: i32, timestamp: impl Into<String>, observer_code: impl Into<String>) -> Self {
        CacheKey {
            remote_id,
            timestamp: timestamp.into(),
            observer_code: observer_code.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: HorizonsRecord,
    inserted_at: Epoch,
}

#[derive(Debug)]
pub struct EphemerisCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl EphemerisCache {
    pub fn new(ttl: Duration) -> Self {
        EphemerisCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // entries are inserted whole, a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up `key` as seen at `now`.
    ///
    /// Return
    /// ----------
    /// * the cached record while `now - inserted_at < ttl`, `None` otherwise.
    ///   An expired entry is dropped on the way out.
    pub fn get(&self, key: &CacheKey, now: Epoch) -> Option<HorizonsRecord> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if now - entry.inserted_at < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace the record stored under `key`, stamped with `now`.
    pub fn put(&self, key: CacheKey, value: HorizonsRecord, now: Epoch) {
        self.entries().insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Number of stored entries, expired ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

#[cfg(test)]
mod ephem_cache_test {
    use super::*;

    fn secs(value: f64) -> Duration {
        Duration::from_seconds(value)
    }

    fn record() -> HorizonsRecord {
        HorizonsRecord {
            ra_degrees: 120.5,
            dec_degrees: 21.25,
            apparent_magnitude: Some(-1.2),
            helio_longitude: 88.0,
            helio_latitude: 1.1,
            helio_distance_au: 1.52,
            geo_distance_au: 0.9,
        }
    }

    fn key() -> CacheKey {
        CacheKey::new(4, "2023-01-01 00:00", "500@399")
    }

    #[test]
    fn test_ttl_boundary() {
        let cache = EphemerisCache::new(secs(3600.0));
        let t0 = Epoch::from_gregorian_utc_at_midnight(2023, 1, 1);
        cache.put(key(), record(), t0);

        assert_eq!(cache.get(&key(), t0 + secs(3599.0)), Some(record()));
        assert_eq!(cache.get(&key(), t0 + secs(3601.0)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expires_exactly_at_ttl() {
        let cache = EphemerisCache::new(secs(3600.0));
        let t0 = Epoch::from_gregorian_utc_at_midnight(2023, 1, 1);
        cache.put(key(), record(), t0);
        assert_eq!(cache.get(&key(), t0 + secs(3600.0)), None);
    }

    #[test]
    fn test_key_components_are_distinct() {
        let cache = EphemerisCache::new(secs(3600.0));
        let t0 = Epoch::from_gregorian_utc_at_midnight(2023, 1, 1);
        cache.put(key(), record(), t0);

        assert!(cache
            .get(&CacheKey::new(5, "2023-01-01 00:00", "500@399"), t0)
            .is_none());
        assert!(cache
            .get(&CacheKey::new(4, "2023-01-01 00:01", "500@399"), t0)
            .is_none());
        assert!(cache
            .get(&CacheKey::new(4, "2023-01-01 00:00", "675@399"), t0)
            .is_none());
        assert!(cache.get(&key(), t0).is_some());
    }

    #[test]
    fn test_put_refreshes_entry() {
        let cache = EphemerisCache::new(secs(3600.0));
        let t0 = Epoch::from_gregorian_utc_at_midnight(2023, 1, 1);
        cache.put(key(), record(), t0);
        cache.put(key(), record(), t0 + secs(3000.0));

        assert!(cache.get(&key(), t0 + secs(6000.0)).is_some());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
