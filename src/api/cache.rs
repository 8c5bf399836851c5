//! Memoization of remote API responses.
//!
//! Two tiers share one key space:
//! - `Revalidate`: time-bounded, for list and detail endpoints
//! - `Forever`: kept until a tag invalidates it, for reference data
//!
//! Concurrent callers asking for the same key wait on a single in-flight
//! request. Failed requests are not stored.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use moka::future::Cache;
use moka::notification::RemovalCause;
use parking_lot::Mutex;
use reqwest::Url;

use crate::config::CacheConfig;

use super::error::FetchError;

/// Maps a resolved request URL to its cache key.
pub type CacheKeyFn = Arc<dyn Fn(&Url) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Expires after the configured revalidation period.
    Revalidate,
    /// Lives until explicitly invalidated by tag.
    Forever,
}

/// Which keys each tag covers, plus a counter per tag that moves on every
/// invalidation.
#[derive(Debug, Default)]
struct TagIndex {
    keys: HashMap<String, HashSet<String>>,
    epochs: HashMap<String, u64>,
}

impl TagIndex {
    fn register(&mut self, key: &str, tags: &[&str]) {
        for tag in tags {
            self.keys.entry(tag.to_string()).or_default().insert(key.to_string());
        }
    }

    fn epochs_of(&self, tags: &[&str]) -> Vec<u64> {
        tags.iter()
            .map(|tag| self.epochs.get(*tag).copied().unwrap_or_default())
            .collect()
    }

    fn take(&mut self, tag: &str) -> HashSet<String> {
        *self.epochs.entry(tag.to_string()).or_default() += 1;
        self.keys.remove(tag).unwrap_or_default()
    }

    fn forget(&mut self, key: &str) {
        self.keys.retain(|_, keys| {
            keys.remove(key);
            !keys.is_empty()
        });
    }
}

#[derive(Clone)]
pub struct ResponseCache {
    timed: Cache<String, Bytes>,
    pinned: Cache<String, Bytes>,
    tags: Arc<Mutex<TagIndex>>,
    key_fn: CacheKeyFn,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        let max_capacity = config.max_capacity.max(1);
        let tags = Arc::new(Mutex::new(TagIndex::default()));
        let timed = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(config.revalidate_seconds))
            .eviction_listener(Self::prune_on_removal(&tags))
            .build();
        let pinned = Cache::builder()
            .max_capacity(max_capacity)
            .eviction_listener(Self::prune_on_removal(&tags))
            .build();
        Self {
            timed,
            pinned,
            tags,
            key_fn: Arc::new(|url: &Url| url.as_str().to_string()),
        }
    }

    /// Keeps the tag index in step with what the caches still hold.
    fn prune_on_removal(
        tags: &Arc<Mutex<TagIndex>>,
    ) -> impl Fn(Arc<String>, Bytes, RemovalCause) + Send + Sync + 'static {
        let tags = Arc::clone(tags);
        move |key, _body, cause| {
            if cause != RemovalCause::Replaced {
                tags.lock().forget(&key);
            }
        }
    }

    /// Replace the default key (the full URL) with a custom signature.
    pub fn with_key_fn(mut self, key_fn: impl Fn(&Url) -> String + Send + Sync + 'static) -> Self {
        self.key_fn = Arc::new(key_fn);
        self
    }

    pub fn key_for(&self, url: &Url) -> String {
        (self.key_fn)(url)
    }

    /// Return the stored body for `url`, or run `fetch` and store its
    /// success under every tag in `tags`.
    ///
    /// A body whose tag was invalidated while it was being fetched is
    /// handed to the caller but not kept.
    pub async fn get_or_fetch<F>(
        &self,
        url: &Url,
        policy: CachePolicy,
        tags: &[&str],
        fetch: F,
    ) -> Result<Bytes, FetchError>
    where
        F: Future<Output = Result<Bytes, FetchError>> + Send,
    {
        let key = self.key_for(url);
        let started = {
            let mut index = self.tags.lock();
            index.register(&key, tags);
            index.epochs_of(tags)
        };

        let cache = match policy {
            CachePolicy::Revalidate => &self.timed,
            CachePolicy::Forever => &self.pinned,
        };

        if cache.contains_key(&key) {
            tracing::debug!(key = %key, "Response cache hit");
        }

        let body = cache
            .try_get_with(key.clone(), fetch)
            .await
            .map_err(|err: Arc<FetchError>| err.as_ref().clone())?;

        if tags.is_empty() {
            return Ok(body);
        }

        let stale = {
            let mut index = self.tags.lock();
            index.register(&key, tags);
            index.epochs_of(tags) != started
        };
        if stale {
            tracing::debug!(key = %key, "Dropping response invalidated mid-flight");
            cache.invalidate(&key).await;
        }
        Ok(body)
    }

    /// Drop a single entry, e.g. after its body failed to decode.
    pub async fn invalidate(&self, url: &Url) {
        let key = self.key_for(url);
        self.timed.invalidate(&key).await;
        self.pinned.invalidate(&key).await;
    }

    /// Drop every entry stored under `tag`. Returns how many keys it covered.
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let keys = self.tags.lock().take(tag);
        for key in &keys {
            self.timed.invalidate(key).await;
            self.pinned.invalidate(key).await;
        }
        tracing::info!(tag = %tag, entries = keys.len(), "Cache tag invalidated");
        keys.len()
    }

    /// Distinct keys referenced by any tag.
    pub fn tagged_keys(&self) -> usize {
        let index = self.tags.lock();
        index.keys.values().flatten().collect::<HashSet<_>>().len()
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("timed_entries", &self.timed.entry_count())
            .field("pinned_entries", &self.pinned.entry_count())
            .field("tagged_keys", &self.tagged_keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> ResponseCache {
        ResponseCache::new(&CacheConfig::default())
    }

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://api.example.com/v2/{path}")).unwrap()
    }

    async fn counted(calls: &AtomicUsize, body: &'static str) -> Result<Bytes, FetchError> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn identical_keys_fetch_once() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let target = url("cards?q=types:Fire");

        let first = cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], counted(&calls, "a"))
            .await
            .unwrap();
        let second = cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], counted(&calls, "b"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let target = url("cards");

        let failed = cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], async {
                Err(FetchError::Status {
                    url: "x".to_string(),
                    status: 500,
                })
            })
            .await;
        assert!(failed.is_err());

        cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], counted(&calls, "ok"))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tag_invalidation_forces_refetch() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let target = url("types");

        cache
            .get_or_fetch(&target, CachePolicy::Forever, &["types"], counted(&calls, "a"))
            .await
            .unwrap();
        assert_eq!(cache.invalidate_tag("types").await, 1);
        cache
            .get_or_fetch(&target, CachePolicy::Forever, &["types"], counted(&calls, "b"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.invalidate_tag("unknown").await, 0);
    }

    #[tokio::test]
    async fn custom_key_fn_merges_requests() {
        let cache = cache().with_key_fn(|url: &Url| url.path().to_string());
        let calls = AtomicUsize::new(0);

        cache
            .get_or_fetch(&url("cards?page=1"), CachePolicy::Revalidate, &[], counted(&calls, "a"))
            .await
            .unwrap();
        cache
            .get_or_fetch(&url("cards?page=2"), CachePolicy::Revalidate, &[], counted(&calls, "b"))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn body_invalidated_while_in_flight_is_not_kept() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let target = url("types");

        let slow = async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, FetchError>(Bytes::from_static(b"old"))
        };
        let (first, _) = tokio::join!(
            cache.get_or_fetch(&target, CachePolicy::Forever, &["types"], slow),
            async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                cache.invalidate_tag("types").await
            },
        );
        assert_eq!(&first.unwrap()[..], b"old");

        let second = cache
            .get_or_fetch(&target, CachePolicy::Forever, &["types"], counted(&calls, "new"))
            .await
            .unwrap();
        assert_eq!(&second[..], b"new");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert_eq!(cache.invalidate_tag("types").await, 1);
    }

    #[tokio::test]
    async fn evicted_keys_leave_the_tag_index() {
        let cache = ResponseCache::new(&CacheConfig {
            max_capacity: 2,
            ..CacheConfig::default()
        });
        let calls = AtomicUsize::new(0);

        for page in 0..50 {
            let target = url(&format!("cards?page={page}"));
            cache
                .get_or_fetch(&target, CachePolicy::Revalidate, &["cards"], counted(&calls, "x"))
                .await
                .unwrap();
        }
        cache.timed.run_pending_tasks().await;

        assert_eq!(calls.load(Ordering::SeqCst), 50);
        assert!(cache.tagged_keys() <= 2, "tag index kept {} keys", cache.tagged_keys());
    }

    #[tokio::test]
    async fn revalidate_entries_expire() {
        let cache = ResponseCache::new(&CacheConfig {
            revalidate_seconds: 1,
            ..CacheConfig::default()
        });
        let calls = AtomicUsize::new(0);
        let target = url("cards/base1-4");

        cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], counted(&calls, "a"))
            .await
            .unwrap();
        cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], counted(&calls, "b"))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let refreshed = cache
            .get_or_fetch(&target, CachePolicy::Revalidate, &[], counted(&calls, "c"))
            .await
            .unwrap();
        assert_eq!(&refreshed[..], b"c");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
