//! MCP server exposing build search tools.

use crate::state::SearchState;
use crate::tools::{
    InspectBuildRequest, SearchRequest, handle_inspect_build, handle_list_weapon_types,
    handle_reload_catalog, handle_search,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for weapon build search
#[derive(Clone)]
pub struct BuildServer {
    /// Shared search state (catalog, index cache, scoring rules)
    state: Arc<SearchState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for BuildServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl BuildServer {
    pub fn new(state: Arc<SearchState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search weapon builds by free text. Matches titles, weapon types and their synonyms (e.g. 'штурм', 'smg'), ranked variants ('топ1', '#2'), module names and module counts ('5'). Returns builds ranked by relevance."
    )]
    async fn search_builds(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Show one build in detail: weapon type, ranked variants, every tab with module display names, and the text it is searched by."
    )]
    async fn inspect_build(
        &self,
        Parameters(request): Parameters<InspectBuildRequest>,
    ) -> std::result::Result<String, String> {
        handle_inspect_build(&self.state, request).await
    }

    #[tool(description = "List weapon type keys with their display labels and build counts.")]
    async fn list_weapon_types(&self) -> std::result::Result<String, String> {
        handle_list_weapon_types(&self.state).await
    }

    #[tool(description = "Reload the build catalog file after it has changed on disk.")]
    async fn reload_catalog(&self) -> std::result::Result<String, String> {
        handle_reload_catalog(&self.state).await
    }
}

#[tool_handler]
impl ServerHandler for BuildServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "loadout-search: relevance search over weapon loadout builds. \
                 Use search_builds with weapon names, types, module names or module counts, \
                 then inspect_build for the full loadout."
                    .to_string(),
            )
    }
}
