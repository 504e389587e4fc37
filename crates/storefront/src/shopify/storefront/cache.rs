//! Tag-based cache for Storefront API responses.
//!
//! Successful response bodies are stored under `(operation, variables)` along
//! with the tags of the request that produced them. Revalidating a tag drops
//! every entry carrying it, whatever its key.
//!
//! Each tag also has a generation counter bumped on revalidation. A fetch
//! that started before a revalidation of one of its tags never lands in the
//! cache, so a slow read cannot resurrect data a mutation just replaced.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;

const MAX_ENTRIES: u64 = 1000;

/// Label attached to cached responses so a webhook can invalidate a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Collections,
    Products,
    Cart,
}

impl CacheTag {
    const ALL: [Self; 3] = [Self::Collections, Self::Products, Self::Cart];

    const fn index(self) -> usize {
        match self {
            Self::Collections => 0,
            Self::Products => 1,
            Self::Cart => 2,
        }
    }

    /// Wire name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::Products => "products",
            Self::Cart => "cart",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tag name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown cache tag: {0}")]
pub struct UnknownCacheTag(String);

impl FromStr for CacheTag {
    type Err = UnknownCacheTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collections" => Ok(Self::Collections),
            "products" => Ok(Self::Products),
            "cart" => Ok(Self::Cart),
            other => Err(UnknownCacheTag(other.to_string())),
        }
    }
}

/// Whether a request may be served from, and stored in, the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve a cached body when present, store successful bodies.
    #[default]
    ForceCache,
    /// Always hit the network and never store the result.
    NoCache,
}

/// A successful response body as received from Shopify.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Arc<str>,
    pub tags: Arc<[CacheTag]>,
}

/// Response cache keyed by operation name and serialized variables.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CachedResponse>,
    generations: Arc<[AtomicU64; CacheTag::ALL.len()]>,
}

/// Tag generations observed when a fetch started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self {
            entries,
            generations: Arc::new(std::array::from_fn(|_| AtomicU64::new(0))),
        }
    }

    /// Cache key for an operation and its JSON-encoded variables.
    pub fn key(operation: &str, variables: &str) -> String {
        format!("{operation}:{variables}")
    }

    pub async fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key).await
    }

    /// Snapshot the generations of `tags`. Counters only grow, so the sum
    /// changes whenever any of them is revalidated.
    pub fn generation(&self, tags: &[CacheTag]) -> Generation {
        Generation(
            tags.iter()
                .map(|tag| self.generations[tag.index()].load(Ordering::Acquire))
                .sum(),
        )
    }

    /// Store `response` unless one of its tags was revalidated after
    /// `started` was taken. Returns whether the entry was kept.
    pub async fn insert(
        &self,
        key: String,
        response: CachedResponse,
        started: Generation,
    ) -> bool {
        let tags = Arc::clone(&response.tags);
        if self.generation(&tags) != started {
            return false;
        }

        self.entries.insert(key.clone(), response).await;

        // A revalidation may have slipped in between the check and the insert.
        if self.generation(&tags) != started {
            self.entries.invalidate(&key).await;
            return false;
        }
        true
    }

    /// Drop every entry carrying any of `tags`.
    pub fn revalidate(&self, tags: &[CacheTag]) {
        if tags.is_empty() {
            return;
        }

        for tag in tags {
            self.generations[tag.index()].fetch_add(1, Ordering::AcqRel);
        }

        let tags: Vec<CacheTag> = tags.to_vec();
        let result = self
            .entries
            .invalidate_entries_if(move |_key, cached| {
                cached.tags.iter().any(|tag| tags.contains(tag))
            });

        if let Err(e) = result {
            // Only fails when closures are unsupported; fall back to a full flush.
            tracing::warn!(error = %e, "Tag invalidation unavailable, clearing response cache");
            self.entries.invalidate_all();
        }
    }

    #[cfg(test)]
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
