//! Inference cache using moka
//!
//! Wraps a QA capability so repeated (question, context) pairs are answered
//! from memory. Keys are blake3 digests of the pair.

use crate::error::QaError;
use crate::qa::{QaAnswer, QaCapability};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls answered from cache
    pub hits: u64,
    /// Calls forwarded to the inner capability
    pub misses: u64,
    /// Entries currently held
    pub entry_count: u64,
}

impl CacheStats {
    /// Share of calls answered from cache
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Shared view of a cache's contents and counters
///
/// Cloning is cheap; every clone observes the same cache.
#[derive(Debug, Clone)]
pub struct CacheHandle {
    cache: Cache<[u8; 32], QaAnswer>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheHandle {
    fn new(cache: Cache<[u8; 32], QaAnswer>) -> Self {
        Self {
            cache,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.cache.entry_count(),
        }
    }

    /// Drop all cached answers
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// Caching decorator over a QA capability
///
/// Only successful answers are cached; failures always reach the inner
/// capability again.
#[derive(Debug)]
pub struct CachedQa<Q> {
    inner: Q,
    handle: CacheHandle,
}

impl<Q: QaCapability> CachedQa<Q> {
    /// Wrap `inner` with a cache of at most `max_capacity` answers
    #[inline]
    #[must_use]
    pub fn new(inner: Q, max_capacity: u64) -> Self {
        Self::from_cache(inner, Cache::new(max_capacity))
    }

    /// Wrap `inner` with a cache whose entries expire after `ttl`
    #[inline]
    #[must_use]
    pub fn with_ttl(inner: Q, max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self::from_cache(inner, cache)
    }

    fn from_cache(inner: Q, cache: Cache<[u8; 32], QaAnswer>) -> Self {
        Self {
            inner,
            handle: CacheHandle::new(cache),
        }
    }

    /// Drop all cached answers
    pub fn invalidate_all(&self) {
        self.handle.invalidate_all();
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.handle.stats()
    }

    /// Handle that keeps reporting after the decorator is type-erased
    #[must_use]
    pub fn handle(&self) -> CacheHandle {
        self.handle.clone()
    }

    /// Wrapped capability
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &Q {
        &self.inner
    }
}

#[async_trait]
impl<Q: QaCapability> QaCapability for CachedQa<Q> {
    async fn infer(&self, question: &str, context: &str) -> Result<QaAnswer, QaError> {
        let key = cache_key(question, context);
        let handle = &self.handle;

        if let Some(cached) = handle.cache.get(&key).await {
            handle.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(question, "inference cache hit");
            return Ok(cached);
        }

        handle.misses.fetch_add(1, Ordering::Relaxed);
        let answer = self.inner.infer(question, context).await?;
        handle.cache.insert(key, answer.clone()).await;
        Ok(answer)
    }
}

/// Digest of a (question, context) pair
fn cache_key(question: &str, context: &str) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(question.as_bytes());
    // Separator keeps ("ab", "c") distinct from ("a", "bc")
    hasher.update(&[0]);
    hasher.update(context.as_bytes());
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QaCapability for Counting {
        async fn infer(&self, question: &str, _context: &str) -> Result<QaAnswer, QaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if question.is_empty() {
                return Err(QaError::Backend("empty question".to_string()));
            }
            Ok(QaAnswer::new("2 m", 0.8))
        }
    }

    #[tokio::test]
    async fn repeated_pair_hits_cache() {
        let cached = CachedQa::new(Counting::default(), 100);

        let first = cached.infer("how tall?", "up to 2 m").await.unwrap();
        let second = cached.infer("how tall?", "up to 2 m").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);

        let stats = cached.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn different_context_misses() {
        let cached = CachedQa::new(Counting::default(), 100);

        cached.infer("how tall?", "up to 2 m").await.unwrap();
        cached.infer("how tall?", "up to 3 m").await.unwrap();

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cached = CachedQa::new(Counting::default(), 100);

        assert!(cached.infer("", "ctx").await.is_err());
        assert!(cached.infer("", "ctx").await.is_err());

        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn handle_tracks_decorator() {
        let cached = CachedQa::new(Counting::default(), 100);
        let handle = cached.handle();

        cached.infer("how tall?", "up to 2 m").await.unwrap();
        cached.infer("how tall?", "up to 2 m").await.unwrap();

        assert_eq!(handle.stats().hits, 1);
        assert_eq!(handle.stats().misses, 1);
        assert_eq!(handle.stats(), cached.stats());
    }

    #[test]
    fn key_separates_fields() {
        assert_ne!(cache_key("ab", "c"), cache_key("a", "bc"));
        assert_eq!(cache_key("q", "c"), cache_key("q", "c"));
    }
}
