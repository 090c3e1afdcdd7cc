use crate::state::SearchState;

/// Re-reads the catalog file and persists the refreshed index cache.
pub async fn handle_reload_catalog(state: &SearchState) -> Result<String, String> {
    let catalog = state
        .reload()
        .await
        .map_err(|e| format!("Failed to reload catalog: {:#}", e))?;

    if let Err(e) = state.persist_cache().await {
        tracing::warn!("Failed to persist index cache: {:#}", e);
    }

    let path = state
        .catalog_path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    Ok(format!(
        "Reloaded {}: {} builds, {} weapon types",
        path,
        catalog.builds().len(),
        catalog.weapon_types().len()
    ))
}
