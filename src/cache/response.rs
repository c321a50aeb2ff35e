//! Bounded LRU + TTL cache for generated commentary.
//!
//! [`ResponseCache`] holds previously generated text keyed by
//! [`Fingerprint`]. Two invalidation mechanisms work together:
//!
//! - **TTL**: entries older than the configured time-to-live are treated as
//!   absent on read and removed at that point (lazy expiry). The worker also
//!   calls [`ResponseCache::sweep_expired`] whenever it wakes with no work,
//!   so idle periods reclaim memory without a dedicated timer.
//! - **LRU**: at capacity, an insert evicts the strict least-recently-used
//!   entry. Reads and writes both refresh recency.
//!
//! All operations take `&self` and are guarded by a single mutex, safe for
//! the worker (writer) plus any number of caller threads (readers). Holds
//! are brief; nothing slow runs under the lock.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::fingerprint::Fingerprint;
use crate::telemetry;

/// Configuration for the response cache.
///
/// ```rust
/// # use patter::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(200)
///     .ttl(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 100.
    pub max_entries: usize,
    /// Time-to-live for cached entries. Default: 60 seconds.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            ttl: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// One cached generation. Owned exclusively by the cache.
struct CacheEntry {
    text: String,
    created_at: Instant,
}

/// In-memory LRU + TTL cache of generated text.
pub struct ResponseCache {
    entries: Mutex<LruCache<Fingerprint, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl: config.ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<Fingerprint, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up cached text for a fingerprint.
    ///
    /// Returns `None` on miss or expiry; an expired entry is removed on
    /// read. A hit marks the entry most-recently-used.
    pub fn get(&self, key: &Fingerprint) -> Option<String> {
        let mut entries = self.lock();
        let expired =
            matches!(entries.peek(key), Some(entry) if entry.created_at.elapsed() > self.ttl);
        if expired {
            entries.pop(key);
        }
        // `get` (unlike `peek`) marks the entry most-recently-used.
        let text = entries.get(key).map(|entry| entry.text.clone());
        if text.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }
        text
    }

    /// Insert or overwrite cached text, marking it most-recently-used.
    ///
    /// At capacity the least-recently-used entry is evicted first.
    pub fn put(&self, key: Fingerprint, text: String) {
        let entry = CacheEntry {
            text,
            created_at: Instant::now(),
        };
        self.lock().push(key, entry);
    }

    /// Remove every entry past its TTL, returning how many were dropped.
    ///
    /// Called opportunistically by the worker when a wait times out with no
    /// work, not on a dedicated timer.
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.lock();
        let expired: Vec<Fingerprint> = entries
            .iter()
            .filter(|(_, entry)| entry.created_at.elapsed() > self.ttl)
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        if !expired.is_empty() {
            tracing::trace!(removed = expired.len(), "swept expired cache entries");
        }
        expired.len()
    }

    /// Number of entries currently held, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
