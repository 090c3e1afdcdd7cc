//! Flattened search text for build records.

use super::normalize::normalize;
use crate::types::BuildRecord;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Display-name lookups consulted while indexing.
pub trait Lookups {
    /// Human-readable label for a weapon type key.
    fn weapon_type_label(&self, key: &str) -> Option<&str>;
    /// Human-readable name for a module key.
    fn module_name(&self, key: &str) -> Option<&str>;
}

/// Plain map pair: `(weapon type key -> label, module key -> name)`.
impl<S: BuildHasher> Lookups for (HashMap<String, String, S>, HashMap<String, String, S>) {
    fn weapon_type_label(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn module_name(&self, key: &str) -> Option<&str> {
        self.1.get(key).map(String::as_str)
    }
}

/// Builds the normalized index string of a record.
///
/// Fragments, in order: title, weapon type key, weapon type label (the key when
/// unknown), present rank variants, then per tab its label, each module key with
/// its display name, and three spellings of the tab's module count.
/// Missing lookup entries only lower recall; they never fail.
pub fn build_index(record: &BuildRecord, lookups: &impl Lookups) -> String {
    let key = record.weapon_type.as_str();
    let label = lookups
        .weapon_type_label(key)
        .filter(|label| !label.is_empty())
        .unwrap_or(key);

    let mut fragments: Vec<String> = vec![record.title.clone(), key.to_string(), label.to_string()];
    fragments.extend(record.ranks().filter_map(|rank| record.top(rank).map(str::to_string)));

    for tab in &record.tabs {
        fragments.push(tab.label.clone());
        for item in &tab.items {
            fragments.push(item.clone());
            fragments.push(lookups.module_name(item).unwrap_or_default().to_string());
        }

        let n = tab.items.len();
        if n > 0 {
            fragments.push(format!("{n} модулей"));
            fragments.push(format!("{n} мод"));
            fragments.push(n.to_string());
        }
    }

    fragments.retain(|fragment| !fragment.is_empty());
    normalize(&fragments.join(" "))
}
