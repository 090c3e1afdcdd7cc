//! Shared state behind the tool handlers: configuration, the loaded catalog and
//! the index cache.

use crate::catalog::Catalog;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::debounce::Debouncer;
use crate::search::{IndexCache, RankOptions, Scorer, rank};
use crate::types::BuildId;
use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub struct SearchState {
    config: SearchConfig,
    scorer: Scorer,
    /// Replaced wholesale on reload; readers keep their snapshot.
    catalog: RwLock<Arc<Catalog>>,
    cache: Mutex<IndexCache>,
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchState")
            .field("catalog_path", &self.config.catalog)
            .field(
                "builds",
                &self.catalog.try_read().ok().map(|c| c.builds().len()),
            )
            .field("cached_indexes", &self.cache.try_lock().ok().map(|c| c.len()))
            .finish()
    }
}

impl SearchState {
    /// Creates state around an already loaded catalog.
    pub fn new(config: SearchConfig, catalog: Catalog) -> Self {
        let cache = match &config.index_cache {
            Some(path) => IndexCache::load(path, config.cache_capacity),
            None => IndexCache::new(config.cache_capacity),
        };
        Self {
            scorer: Scorer::from_config(&config),
            catalog: RwLock::new(Arc::new(catalog)),
            cache: Mutex::new(cache),
            config,
        }
    }

    /// Loads the configured catalog. Without a configured catalog the state
    /// starts empty.
    pub fn from_config(config: SearchConfig) -> Result<Self> {
        let catalog = match &config.catalog {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?,
            None => {
                tracing::warn!(
                    "No catalog configured; set {} or `catalog` in the config file",
                    crate::config::CATALOG_ENV
                );
                Catalog::new(vec![], vec![], vec![])?
            }
        };

        let unknown = catalog.unknown_weapon_types();
        if !unknown.is_empty() {
            tracing::warn!("Builds use weapon types without labels: {}", unknown.join(", "));
        }

        Ok(Self::new(config, catalog))
    }

    pub const fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.config.catalog.as_deref()
    }

    /// Snapshot of the current catalog.
    pub async fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&*self.catalog.read().await)
    }

    /// Exclusive access to the index cache.
    pub async fn cache(&self) -> tokio::sync::MutexGuard<'_, IndexCache> {
        self.cache.lock().await
    }

    /// Re-reads the catalog file and swaps it in. The old catalog stays in place
    /// when loading fails.
    pub async fn reload(&self) -> Result<Arc<Catalog>> {
        let path: PathBuf = self
            .catalog_path()
            .ok_or_else(|| anyhow!("No catalog file configured"))?
            .to_path_buf();

        let catalog = tokio::task::spawn_blocking({
            let path = path.clone();
            move || Catalog::load(&path)
        })
        .await
        .context("Catalog loading task panicked")?
        .with_context(|| format!("Failed to reload catalog {}", path.display()))?;

        let catalog = Arc::new(catalog);
        *self.catalog.write().await = Arc::clone(&catalog);
        Ok(catalog)
    }

    /// Ranks the current catalog for `query`, best first.
    pub async fn rank_ids(&self, query: &str, options: RankOptions<'_>) -> Vec<(BuildId, u32)> {
        let catalog = self.catalog().await;
        let mut cache = self.cache.lock().await;
        rank(&catalog, &mut cache, &self.scorer, query, options)
            .into_iter()
            .map(|ranked| (ranked.record.id, ranked.score))
            .collect()
    }

    /// Debounces query input with the configured delay. The last query of each
    /// burst is ranked and handed to `on_results` with its results.
    pub fn debounced_search<F>(self: &Arc<Self>, on_results: F) -> Debouncer<String>
    where
        F: Fn(String, Vec<(BuildId, u32)>) + Send + Sync + 'static,
    {
        let state = Arc::clone(self);
        let on_results = Arc::new(on_results);
        Debouncer::new(self.config.debounce_delay(), move |query: String| {
            let state = Arc::clone(&state);
            let on_results = Arc::clone(&on_results);
            tokio::spawn(async move {
                let results = state.rank_ids(&query, RankOptions::default()).await;
                on_results(query, results);
            });
        })
    }

    /// Writes the index cache to the configured file, if any.
    pub async fn persist_cache(&self) -> Result<()> {
        let Some(path) = self.config.index_cache.as_deref() else {
            return Ok(());
        };
        self.cache.lock().await.store(path)
    }
}
