use anyhow::Context;
use loadout_search::{BuildServer, SearchConfig, SearchState};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the MCP protocol
    loadout_search::tracing::init();

    let config = SearchConfig::resolve().context("Failed to load configuration")?;
    let state = Arc::new(SearchState::from_config(config)?);

    tracing::info!("Starting loadout-search MCP server");

    let server = BuildServer::new(Arc::clone(&state));
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    if let Err(e) = state.persist_cache().await {
        tracing::warn!("Failed to persist index cache: {:#}", e);
    }

    Ok(())
}
