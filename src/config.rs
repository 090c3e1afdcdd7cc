//! Search configuration: score weights, synonym tables, cache and debounce settings.
//!
//! Every field defaults to the built-in tables, so an empty or missing config file
//! yields the stock ranking behavior. Configuration is read once at startup and is
//! immutable afterwards.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LOADOUT_SEARCH_CONFIG";

/// Environment variable overriding the catalog path.
pub const CATALOG_ENV: &str = "LOADOUT_SEARCH_CATALOG";

/// Default debounce delay for query input.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Default number of cached index strings.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Catalog JSON file served by the tool server.
    pub catalog: Option<PathBuf>,
    /// File the index cache is persisted to between runs.
    pub index_cache: Option<PathBuf>,
    pub debounce_ms: u64,
    pub cache_capacity: usize,
    pub weights: ScoreWeights,
    pub synonyms: SynonymTables,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            index_cache: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            weights: ScoreWeights::default(),
            synonyms: SynonymTables::default(),
        }
    }
}

/// Points awarded by each scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub exact: u32,
    pub synonym: u32,
    pub partial: u32,
    pub top: u32,
}

impl ScoreWeights {
    /// Bonus for a query number equal to some tab's module count.
    pub const fn numeric(&self) -> u32 {
        self.exact.saturating_add(1)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact: 5,
            synonym: 4,
            partial: 2,
            top: 3,
        }
    }
}

/// Alternate phrasings users type for weapon types and rank tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymTables {
    /// Weapon type key to synonyms.
    pub types: BTreeMap<String, Vec<String>>,
    pub top: TopSynonyms,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopSynonyms {
    pub first: Vec<String>,
    pub second: Vec<String>,
    pub third: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for SynonymTables {
    fn default() -> Self {
        let types = [
            ("assault", &["штурм", "штурмовые", "ar", "ак", "калаш", "винтовка"][..]),
            ("pp", &["пп", "smg", "автомат", "автоматы"][..]),
            ("pulemet", &["пулемет", "пулемёт", "lmg", "ручной"][..]),
            ("snayperki", &["снайпер", "снайперки", "снайпа", "sniper", "sr"][..]),
            ("drobovik", &["дробовик", "дроб", "shotgun", "sg"][..]),
            (
                "pehotnay",
                &["марксман", "марксманка", "dmr", "пехотная", "тактическая"][..],
            ),
        ]
        .into_iter()
        .map(|(key, list)| (key.to_string(), words(list)))
        .collect();

        Self {
            types,
            top: TopSynonyms::default(),
        }
    }
}

impl Default for TopSynonyms {
    fn default() -> Self {
        Self {
            first: words(&["#1", "топ1", "топ 1", "№1", "номер 1", "первый"]),
            second: words(&["#2", "топ2", "топ 2", "№2", "второй"]),
            third: words(&["#3", "топ3", "топ 3", "№3", "третий"]),
        }
    }
}

impl SearchConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parses a config from TOML text.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content, path)?;
        config.catalog = config.catalog.map(|p| expand_path(&p));
        config.index_cache = config.index_cache.map(|p| expand_path(&p));
        Ok(config)
    }

    /// Resolves the active configuration.
    ///
    /// Uses `LOADOUT_SEARCH_CONFIG` when set, else `<config dir>/loadout-search/config.toml`
    /// when it exists, else defaults. `LOADOUT_SEARCH_CATALOG` overrides the catalog path.
    pub fn resolve() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.or_else(default_config_path) {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            Some(path) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        if let Some(catalog) = std::env::var_os(CATALOG_ENV) {
            config.catalog = Some(expand_path(Path::new(&catalog)));
        }
        Ok(config)
    }
}

/// `<config dir>/loadout-search/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("loadout-search").join("config.toml"))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(expand_tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
