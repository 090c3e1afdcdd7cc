//! Detailed view of one build, including its search index.

use crate::search::Lookups;
use crate::state::SearchState;
use crate::types::BuildId;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InspectBuildRequest {
    /// Build id as listed by search_builds
    pub id: u64,
}

pub async fn handle_inspect_build(
    state: &SearchState,
    request: InspectBuildRequest,
) -> Result<String, String> {
    let catalog = state.catalog().await;
    let record = catalog
        .get(BuildId(request.id))
        .ok_or_else(|| format!("Build {} not found", request.id))?;
    let index = state.cache().await.index_for(&catalog, record);

    let mut output = format!("`{}` [id {}]\n", record.title, record.id);
    if !record.weapon_type.is_empty() {
        let _ = writeln!(
            output,
            "Type: {} ({})",
            catalog.label_for(&record.weapon_type),
            record.weapon_type
        );
    }
    for rank in record.ranks() {
        if let Some(text) = record.top(rank) {
            let _ = writeln!(output, "{}: {}", rank.tag(), text);
        }
    }

    for tab in &record.tabs {
        let label = if tab.label.is_empty() {
            "(untitled)"
        } else {
            tab.label.as_str()
        };
        let _ = writeln!(output, "\n{} ({} modules):", label, tab.items.len());
        for item in &tab.items {
            match catalog.module_name(item).filter(|name| !name.is_empty()) {
                Some(name) => {
                    let _ = writeln!(output, "  • {} ({})", name, item);
                }
                None => {
                    let _ = writeln!(output, "  • {} (no display name)", item);
                }
            }
        }
    }

    let _ = writeln!(output, "\nSearch index:\n{}", index);
    Ok(output)
}
