use crate::state::SearchState;
use std::fmt::Write as _;

/// Lists weapon types with labels and build counts, including keys used by
/// builds that have no label.
pub async fn handle_list_weapon_types(state: &SearchState) -> Result<String, String> {
    let catalog = state.catalog().await;
    if catalog.weapon_types().is_empty() && catalog.builds().is_empty() {
        return Err("No catalog loaded.".to_string());
    }

    let counts = catalog.build_counts();
    let mut output = format!("Weapon types ({}):\n", catalog.weapon_types().len());
    for weapon_type in catalog.weapon_types() {
        let builds = counts.get(weapon_type.key.as_str()).copied().unwrap_or(0);
        let _ = writeln!(
            output,
            "  • {} - {} ({} builds)",
            weapon_type.key,
            catalog.label_for(&weapon_type.key),
            builds
        );
    }

    let unknown = catalog.unknown_weapon_types();
    if !unknown.is_empty() {
        let _ = writeln!(output, "\nWithout label:");
        for key in unknown {
            let builds = counts.get(key).copied().unwrap_or(0);
            let _ = writeln!(output, "  • {} ({} builds)", key, builds);
        }
    }
    Ok(output)
}
