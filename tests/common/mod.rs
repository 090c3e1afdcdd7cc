//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `catalog`: the sample catalog parsed in memory
//! - `isolated_state`: a `SearchState` backed by a catalog file in a fresh temp
//!   directory, with its index cache persisted next to it
//!
//! Both fixtures install the tracing subscriber, so library logs show up in
//! failing test output.
//!
//! Each test using `isolated_state` gets its own directory, so reload and cache
//! persistence tests cannot interfere with each other.

use loadout_search::{Catalog, SearchConfig, SearchState};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Catalog shaped like the backend payloads: weapon types, per-type module
/// groups and builds.
pub const SAMPLE_CATALOG: &str = r##"{
  "weapon_types": [
    {"key": "assault", "label": "Штурмовые винтовки"},
    {"key": "pp", "label": "Пистолеты-пулеметы"},
    {"key": "snayperki", "label": "Снайперские винтовки"}
  ],
  "modules": {
    "assault": {
      "Дуло": [
        {"en": "mono-suppressor", "ru": "Монолитный глушитель"},
        {"en": "compensator", "ru": "Компенсатор"}
      ],
      "Прицел": [{"en": "red-dot", "ru": "Коллиматор"}]
    },
    "pp": {
      "Магазин": [{"en": "drum-50", "ru": "Барабан на 50"}]
    }
  },
  "builds": [
    {
      "id": 10,
      "title": "Kilo 141",
      "weapon_type": "assault",
      "top1": "Мета сезона",
      "top2": null,
      "top3": "",
      "tabs": [
        {"label": "Основное", "items": ["mono-suppressor", "red-dot", "grip-a", "stock-b", "laser-c"]}
      ]
    },
    {
      "id": 11,
      "title": "MP5 Rush",
      "weapon_type": "pp",
      "top2": "Ближний бой",
      "tabs": [
        {"label": "Основное", "items": ["drum-50", "compensator", "grip-a"]}
      ]
    },
    {
      "id": 12,
      "title": "Desert Eagle Akimbo",
      "weapon_type": "pistol",
      "tabs": []
    },
    {
      "id": 13,
      "title": "Kar98k Quickscope",
      "weapon_type": "snayperki",
      "tabs": [
        {"label": "Основное", "items": ["a", "b", "c", "d"]},
        {"label": "Запас", "items": ["red-dot"]}
      ]
    }
  ]
}"##;

/// Returns the sample catalog parsed in memory.
#[fixture]
pub fn catalog() -> Catalog {
    loadout_search::tracing::init();
    Catalog::from_json(SAMPLE_CATALOG, Path::new("sample.json")).expect("sample catalog parses")
}

/// A search state backed by files in a temporary directory.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct IsolatedState {
    dir: TempDir,
    pub state: Arc<SearchState>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl IsolatedState {
    pub fn new() -> Self {
        Self::with_catalog(SAMPLE_CATALOG)
    }

    /// Writes `content` as the catalog file and loads a state from it.
    pub fn with_catalog(content: &str) -> Self {
        loadout_search::tracing::init();
        let dir = TempDir::new().expect("Failed to create temp directory");
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(&catalog_path, content).expect("Failed to write catalog");

        let config = SearchConfig {
            catalog: Some(catalog_path),
            index_cache: Some(dir.path().join("cache").join("index.bin")),
            ..SearchConfig::default()
        };
        let state = SearchState::from_config(config).expect("Failed to load search state");

        Self {
            dir,
            state: Arc::new(state),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("catalog.json")
    }

    pub fn index_cache_path(&self) -> PathBuf {
        self.dir.path().join("cache").join("index.bin")
    }

    /// Replaces the catalog file on disk (the state is not reloaded).
    pub fn rewrite_catalog(&self, content: &str) {
        std::fs::write(self.catalog_path(), content).expect("Failed to rewrite catalog");
    }
}

#[fixture]
pub fn isolated_state() -> IsolatedState {
    IsolatedState::new()
}
