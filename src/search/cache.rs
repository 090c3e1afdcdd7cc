//! Index string cache keyed by build id.
//!
//! Each entry remembers a fingerprint of the record it was built from, so an
//! edited build is re-indexed on next use. The whole cache is invalidated when the
//! catalog's lookup tables change. The cache can be persisted with postcard
//! between runs.

use super::index::build_index;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::{BuildId, BuildRecord};
use anyhow::Context;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use xxhash_rust::xxh3::Xxh3;

#[derive(Debug, Clone)]
struct CachedIndex {
    fingerprint: u64,
    index: Arc<str>,
}

/// On-disk form of the cache, most recently used entry first.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCache {
    lookup_fingerprint: u64,
    entries: Vec<(BuildId, u64, String)>,
}

/// Hit/miss counters since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct IndexCache {
    entries: LruCache<BuildId, CachedIndex>,
    lookup_fingerprint: Option<u64>,
    stats: CacheStats,
}

impl IndexCache {
    /// Creates an empty cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            lookup_fingerprint: None,
            stats: CacheStats::default(),
        }
    }

    /// Returns the index of `record`, building it when missing or stale.
    pub fn index_for(&mut self, catalog: &Catalog, record: &BuildRecord) -> Arc<str> {
        self.sync_lookups(catalog.lookup_fingerprint());

        let fingerprint = record_fingerprint(record);
        if let Some(cached) = self.entries.get(&record.id)
            && cached.fingerprint == fingerprint
        {
            self.stats.hits += 1;
            return Arc::clone(&cached.index);
        }

        self.stats.misses += 1;
        tracing::debug!("Indexing build {} ('{}')", record.id, record.title);
        let index: Arc<str> = build_index(record, catalog).into();
        self.entries.put(
            record.id,
            CachedIndex {
                fingerprint,
                index: Arc::clone(&index),
            },
        );
        index
    }

    /// Drops every entry when the lookup tables differ from those the entries
    /// were built with.
    fn sync_lookups(&mut self, lookup_fingerprint: u64) {
        if self.lookup_fingerprint != Some(lookup_fingerprint) {
            if !self.entries.is_empty() {
                tracing::debug!(
                    "Lookup tables changed, dropping {} cached indexes",
                    self.entries.len()
                );
            }
            self.entries.clear();
            self.lookup_fingerprint = Some(lookup_fingerprint);
        }
    }

    /// Grows the cache to hold at least `entries` indexes, so a pass over the
    /// whole catalog does not evict its own entries.
    pub fn reserve(&mut self, entries: usize) {
        if let Some(needed) = NonZeroUsize::new(entries)
            && needed > self.entries.cap()
        {
            tracing::debug!(
                "Growing index cache from {} to {} entries",
                self.entries.cap(),
                needed
            );
            self.entries.resize(needed);
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Writes the cache to `path`, replacing any previous file.
    pub fn store(&self, path: &Path) -> Result<()> {
        let persisted = PersistedCache {
            lookup_fingerprint: self.lookup_fingerprint.unwrap_or_default(),
            entries: self
                .entries
                .iter()
                .map(|(id, cached)| (*id, cached.fingerprint, cached.index.to_string()))
                .collect(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create index cache {}", path.display()))?;
        postcard::to_io(&persisted, file)
            .with_context(|| format!("Failed to write index cache {}", path.display()))?;

        tracing::debug!(
            "Cached {} build indexes to {}",
            persisted.entries.len(),
            path.display()
        );
        Ok(())
    }

    /// Restores a cache written by [`IndexCache::store`].
    ///
    /// Missing or unreadable files yield an empty cache.
    pub fn load(path: &Path, capacity: usize) -> Self {
        let mut cache = Self::new(capacity);

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return cache,
            Err(e) => {
                tracing::warn!("Failed to read index cache {}: {}", path.display(), e);
                return cache;
            }
        };

        match postcard::from_bytes::<PersistedCache>(&bytes) {
            Ok(persisted) => {
                cache.lookup_fingerprint = Some(persisted.lookup_fingerprint);
                // oldest first, so recency survives the round trip
                for (id, fingerprint, index) in persisted.entries.into_iter().rev() {
                    cache.entries.put(
                        id,
                        CachedIndex {
                            fingerprint,
                            index: index.into(),
                        },
                    );
                }
                tracing::debug!(
                    "Loaded {} cached build indexes from {}",
                    cache.len(),
                    path.display()
                );
            }
            Err(e) => {
                tracing::warn!("Failed to deserialize index cache at {}: {}", path.display(), e);
            }
        }
        cache
    }
}

/// Hash of every record field that feeds the index or the scorer.
pub fn record_fingerprint(record: &BuildRecord) -> u64 {
    let mut hasher = Xxh3::new();
    let mut field = |text: &str| {
        hasher.update(text.as_bytes());
        hasher.update(&[0xff]);
    };

    field(&record.title);
    field(&record.weapon_type);
    for top in [&record.top1, &record.top2, &record.top3] {
        field(top.as_deref().unwrap_or("\u{0}"));
    }
    for tab in &record.tabs {
        field(&tab.label);
        for item in &tab.items {
            field(item);
        }
        field("\u{1}");
    }
    hasher.digest()
}
