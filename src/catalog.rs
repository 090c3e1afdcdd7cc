//! Build catalog: the builds plus the weapon type and module display names
//! needed to index them.
//!
//! A catalog is read from one JSON document shaped like the backend payloads:
//!
//! ```json
//! {
//!   "weapon_types": [{"key": "assault", "label": "Штурмовые винтовки"}],
//!   "modules": {"assault": {"Дуло": [{"en": "mono", "ru": "Монолитный глушитель"}]}},
//!   "builds": [{"id": 1, "title": "M4", "weapon_type": "assault", "tabs": []}]
//! }
//! ```

use crate::error::CatalogError;
use crate::search::Lookups;
use crate::types::{BuildId, BuildRecord, ModuleEntry, WeaponType};
use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Module files group entries per weapon type, then per category.
type ModuleGroups = BTreeMap<String, BTreeMap<String, Vec<ModuleEntry>>>;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    weapon_types: Vec<WeaponType>,
    #[serde(default)]
    modules: ModuleGroups,
    #[serde(default)]
    builds: Vec<BuildRecord>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    builds: Vec<BuildRecord>,
    positions: AHashMap<BuildId, usize>,
    weapon_types: Vec<WeaponType>,
    labels: AHashMap<String, String>,
    module_names: AHashMap<String, String>,
    lookup_fingerprint: u64,
}

impl Catalog {
    /// Assembles a catalog, flattening module entries into one key -> name map.
    ///
    /// A module key listed under several types keeps the name seen last.
    pub fn new(
        builds: Vec<BuildRecord>,
        weapon_types: Vec<WeaponType>,
        modules: impl IntoIterator<Item = ModuleEntry>,
    ) -> Result<Self, CatalogError> {
        let mut positions = AHashMap::with_capacity(builds.len());
        for (position, build) in builds.iter().enumerate() {
            if positions.insert(build.id, position).is_some() {
                return Err(CatalogError::DuplicateId(build.id));
            }
        }

        let labels: AHashMap<String, String> = weapon_types
            .iter()
            .map(|t| (t.key.clone(), t.label.clone()))
            .collect();
        let module_names: AHashMap<String, String> =
            modules.into_iter().map(|m| (m.en, m.ru)).collect();
        let lookup_fingerprint = fingerprint_lookups(&labels, &module_names);

        Ok(Self {
            builds,
            positions,
            weapon_types,
            labels,
            module_names,
            lookup_fingerprint,
        })
    }

    /// Parses catalog JSON; `path` is only used for error reporting.
    pub fn from_json(content: &str, path: &Path) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let modules = file
            .modules
            .into_values()
            .flat_map(BTreeMap::into_values)
            .flatten();
        Self::new(file.builds, file.weapon_types, modules)
    }

    /// Reads a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&content, path)?;
        tracing::info!(
            "Loaded catalog from {}: {} builds, {} weapon types, {} modules",
            path.display(),
            catalog.builds.len(),
            catalog.weapon_types.len(),
            catalog.module_names.len()
        );
        Ok(catalog)
    }

    /// Builds in backend order.
    pub fn builds(&self) -> &[BuildRecord] {
        &self.builds
    }

    pub fn get(&self, id: BuildId) -> Option<&BuildRecord> {
        self.positions.get(&id).map(|&position| &self.builds[position])
    }

    pub fn weapon_types(&self) -> &[WeaponType] {
        &self.weapon_types
    }

    /// Display label of a weapon type, falling back to the key itself.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.weapon_type_label(key)
            .filter(|label| !label.is_empty())
            .unwrap_or(key)
    }

    /// Number of builds per weapon type key.
    pub fn build_counts(&self) -> AHashMap<&str, usize> {
        let mut counts = AHashMap::new();
        for build in &self.builds {
            *counts.entry(build.weapon_type.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Weapon type keys used by builds but missing from the type list.
    pub fn unknown_weapon_types(&self) -> Vec<&str> {
        let mut seen = AHashSet::new();
        self.builds
            .iter()
            .map(|b| b.weapon_type.as_str())
            .filter(|key| !key.is_empty() && !self.labels.contains_key(*key))
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Hash of both lookup tables. Index strings built against a catalog with a
    /// different value are stale.
    pub const fn lookup_fingerprint(&self) -> u64 {
        self.lookup_fingerprint
    }
}

impl Lookups for Catalog {
    fn weapon_type_label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    fn module_name(&self, key: &str) -> Option<&str> {
        self.module_names.get(key).map(String::as_str)
    }
}

fn fingerprint_lookups(
    labels: &AHashMap<String, String>,
    module_names: &AHashMap<String, String>,
) -> u64 {
    let mut hasher = Xxh3::new();
    for table in [labels, module_names] {
        let mut pairs: Vec<_> = table.iter().collect();
        pairs.sort_unstable();
        for (key, value) in pairs {
            hasher.update(key.as_bytes());
            hasher.update(&[0xff]);
            hasher.update(value.as_bytes());
            hasher.update(&[0xfe]);
        }
        hasher.update(&[0xfd]);
    }
    hasher.digest()
}
