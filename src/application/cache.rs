//! In-process memoization cache for remote fetches.
//!
//! Replaces the ambient per-function memoization of a typical client app
//! with an explicit, injectable cache object. Entries are keyed by operation
//! name plus canonical arguments, hold a JSON value and a creation instant,
//! and age out after a per-operation freshness window. There is no explicit
//! invalidation; stale entries are recomputed lazily on the next access.
//! Fetch failures are never cached.

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Freshness windows, chosen per operation by expected data volatility.
pub mod ttl {
    use std::time::Duration;

    /// Activity data changes fastest.
    pub const MINUTES_5: Duration = Duration::from_secs(60 * 5);
    /// Repositories, traffic, manifests, router probes.
    pub const HOURS_1: Duration = Duration::from_secs(60 * 60);
    /// Pinned repos, organizations, social accounts, releases, alerts.
    pub const HOURS_12: Duration = Duration::from_secs(60 * 60 * 12);
}

/// Default maximum number of live entries.
pub const DEFAULT_CAPACITY: usize = 256;

struct CacheEntry {
    value: Value,
    created: Instant,
}

/// Cache statistics exposed on the health endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Time-bucketed memoization keyed by operation identity and arguments.
pub struct MemoryCache {
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Canonical key for an operation invocation.
    fn key(op: &str, args: &[&str]) -> String {
        if args.is_empty() {
            op.to_string()
        } else {
            format!("{}:{}", op, args.join(":"))
        }
    }

    /// Return the cached value for `op(args)` while it is younger than
    /// `ttl`, otherwise invoke `fetcher` and store its result.
    ///
    /// Errors from the fetcher propagate to the caller and leave the cache
    /// untouched, so the next access retries.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        op: &str,
        args: &[&str],
        ttl: Duration,
        fetcher: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let key = Self::key(op, args);

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.created.elapsed() < ttl {
                    if let Ok(value) = serde_json::from_value(entry.value.clone()) {
                        debug!("Cache hit: {}", key);
                        self.hits.fetch_add(1, Ordering::Relaxed);
                        return Ok(value);
                    }
                    warn!("Cache entry for {} failed to deserialize, refetching", key);
                }
            }
        }

        debug!("Cache miss, fetching: {}", key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = fetcher().await?;

        let json = serde_json::to_value(&value)?;
        self.insert(key, json).await;
        Ok(value)
    }

    async fn insert(&self, key: String, value: Value) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            // Evict the oldest entry to stay within capacity.
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.created)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                created: Instant::now(),
            },
        );
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().await.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn ttl_windows_are_ordered_by_volatility() {
        assert!(ttl::MINUTES_5 < ttl::HOURS_1);
        assert!(ttl::HOURS_1 < ttl::HOURS_12);
        assert_eq!(ttl::HOURS_12, Duration::from_secs(43_200));
    }

    #[tokio::test]
    async fn second_call_within_window_does_not_refetch() {
        let cache = MemoryCache::new(16);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = calls.clone();
            let value: u32 = cache
                .get_or_fetch("repos", &["octocat"], ttl::HOURS_1, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let cache = MemoryCache::new(16);
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = calls.clone();
            // Zero TTL: every entry is stale by the time it is read back.
            let _: u32 = cache
                .get_or_fetch("activity", &["octocat"], Duration::ZERO, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_arguments_are_distinct_entries() {
        let cache = MemoryCache::new(16);
        let calls = Arc::new(AtomicUsize::new(0));

        for login in ["octocat", "hubot"] {
            let calls = calls.clone();
            let _: String = cache
                .get_or_fetch("profile", &[login], ttl::HOURS_1, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(login.to_string())
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = MemoryCache::new(16);
        let calls = Arc::new(AtomicUsize::new(0));

        for attempt in 0..2 {
            let calls = calls.clone();
            let result: Result<u32> = cache
                .get_or_fetch("traffic", &["octocat", "site"], ttl::HOURS_1, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    if attempt == 0 {
                        anyhow::bail!("boom")
                    }
                    Ok(3)
                })
                .await;
            if attempt == 0 {
                assert!(result.is_err());
            } else {
                assert_eq!(result.unwrap(), 3);
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn capacity_is_enforced_by_evicting_oldest() {
        let cache = MemoryCache::new(2);
        for login in ["a", "b", "c"] {
            let _: u32 = cache
                .get_or_fetch("profile", &[login], ttl::HOURS_1, || async { Ok(0) })
                .await
                .unwrap();
        }
        assert_eq!(cache.stats().await.entries, 2);
    }
}
