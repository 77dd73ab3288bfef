//! # Response Cache
//!
//! Time-bounded memoization of source lookups, keyed by `(source, query)`.
//! One cache is built at startup and shared by handle (`Arc<ResponseCache>`)
//! with the aggregator; tests build a fresh one each.
//!
//! Entries never change once written. An entry older than its TTL is treated
//! as absent and recomputed on the next access. There is no size bound: the
//! key space is the set of drug names a process has been asked about.
//!
//! Failure results are cached too, for [`FAILURE_TTL`]. That keeps a
//! transient upstream outage visible for the whole window; embedders that
//! want faster recovery can shorten it with [`ResponseCache::with_ttls`].

use crate::client::sources::{SourceId, SourceResult};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// Lifetime of a cached successful lookup
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Lifetime of a cached failed lookup
pub const FAILURE_TTL: Duration = CACHE_TTL;

type CacheKey = (SourceId, String);

/// A cached lookup result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached result
    pub result: SourceResult,
    /// When the result was stored
    pub stored_at: Instant,
    /// How long the entry stays live
    pub ttl: Duration,
}

impl CacheEntry {
    fn new(result: SourceResult, ttl: Duration) -> Self {
        Self {
            result,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired as of `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= self.ttl
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that had to compute
    pub misses: u64,
    /// Misses caused by a stale entry
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Shared TTL cache for [`SourceResult`]s
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    stats: RwLock<CacheStats>,
    success_ttl: Duration,
    failure_ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with the standard one-hour TTL
    pub fn new() -> Self {
        Self::with_ttls(CACHE_TTL, FAILURE_TTL)
    }

    /// Create a cache whose entries all live for `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_ttls(ttl, ttl)
    }

    /// Create a cache with separate lifetimes for successes and failures
    pub fn with_ttls(success_ttl: Duration, failure_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
            success_ttl,
            failure_ttl,
        }
    }

    /// Return the live entry for `(source, query)`, or run `compute` and store its result
    ///
    /// No lock is held while `compute` runs, so two concurrent misses on the
    /// same key may both compute; the later write wins.
    pub async fn get_or_compute<F, Fut>(&self, source: SourceId, query: &str, compute: F) -> SourceResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SourceResult>,
    {
        let key = (source, query.to_string());

        if let Some(result) = self.get_live(&key).await {
            debug!("Cache hit for {} / {}", source, query);
            return result;
        }

        let result = compute().await;
        let ttl = if result.is_success() {
            self.success_ttl
        } else {
            self.failure_ttl
        };

        self.entries
            .write()
            .await
            .insert(key, CacheEntry::new(result.clone(), ttl));
        debug!("Cached {} / {} (TTL: {:?})", source, query, ttl);

        result
    }

    async fn get_live(&self, key: &CacheKey) -> Option<SourceResult> {
        let now = Instant::now();
        let (live, stale) = {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => (Some(entry.result.clone()), false),
                Some(_) => (None, true),
                None => (None, false),
            }
        };

        let mut stats = self.stats.write().await;
        if live.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
            if stale {
                stats.expirations += 1;
                debug!("Cache entry expired: {} / {}", key.0, key.1);
            }
        }

        live
    }

    /// Remove expired entries, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        if removed > 0 {
            info!("Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Drop every entry and reset statistics
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        *self.stats.write().await = CacheStats::default();
        info!("Cleared all cache entries");
    }

    /// Number of stored entries, live or stale
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of the hit/miss counters
    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
