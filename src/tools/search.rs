//! Ranked build search handler.

use crate::search::{MIN_FILTER_QUERY_CHARS, RankOptions, RankedBuild, rank};
use crate::state::SearchState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text query: weapon names, types, module names, "топ1", module counts
    pub query: String,
    /// Restrict results to one weapon type key (e.g. "assault")
    #[serde(default)]
    pub weapon_type: Option<String>,
    /// Maximum number of results to return (default: 10)
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
}

fn default_limit() -> Option<usize> {
    Some(10)
}

/// Scores every build against the query and lists the visible ones, best first.
pub async fn handle_search(state: &SearchState, request: SearchRequest) -> Result<String, String> {
    let catalog = state.catalog().await;
    if catalog.builds().is_empty() {
        return Err("No builds loaded. Configure a catalog and use reload_catalog.".to_string());
    }

    let options = RankOptions {
        weapon_type: request.weapon_type.as_deref(),
        limit: request.limit,
    };
    let results = {
        let mut cache = state.cache().await;
        rank(&catalog, &mut cache, state.scorer(), &request.query, options)
    };

    if results.is_empty() {
        let mut msg = format!("No builds match '{}'.\n\n", request.query);
        msg.push_str("Search tips:\n");
        msg.push_str("• Try a weapon name or a shorter fragment of it\n");
        msg.push_str("• Weapon types accept synonyms: 'штурм', 'smg', 'снайпер'\n");
        msg.push_str("• 'топ1', '#2' or 'третий' find ranked builds\n");
        msg.push_str("• A number like '5' finds builds with a 5-module tab\n");
        if let Some(weapon_type) = &request.weapon_type {
            let _ = writeln!(msg, "• Results were limited to weapon type '{}'", weapon_type);
        }
        return Ok(msg);
    }

    let mut output = if request.query.chars().count() < MIN_FILTER_QUERY_CHARS {
        format!("Showing {} builds:\n\n", results.len())
    } else {
        format!(
            "Search results for '{}' ({} of {} builds):\n\n",
            request.query,
            results.len(),
            catalog.builds().len()
        )
    };

    for (idx, result) in results.iter().enumerate() {
        let label = catalog.label_for(&result.record.weapon_type);
        format_result(&mut output, idx + 1, result, label);
    }
    Ok(output)
}

fn format_result(output: &mut String, position: usize, result: &RankedBuild<'_>, label: &str) {
    let record = result.record;
    let _ = write!(output, "{}. `{}` [id {}]", position, record.title, record.id);
    if !label.is_empty() {
        let _ = write!(output, " - {}", label);
    }
    let _ = writeln!(output, " - score: {}", result.score);

    let ranks: Vec<String> = record
        .ranks()
        .filter_map(|rank| record.top(rank).map(|text| format!("{} {}", rank.tag(), text)))
        .collect();
    if !ranks.is_empty() {
        let _ = writeln!(output, "   {}", ranks.join(" · "));
    }
    output.push('\n');
}
