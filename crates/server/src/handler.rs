//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::state::AppState;
use crate::tools::{
    BadgeStatusParams, FindDiscussionsParams, SetOptionsParams, TabEventParams, badge_status, clear_cache,
    find_discussions, options, tab_event,
};

/// The main MCP server handler for tabthreads.
#[derive(Clone)]
pub struct TabThreadsServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl TabThreadsServer {
    /// Create a new server handler.
    pub fn new(state: AppState) -> Self {
        Self { state: Arc::new(state), tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Find Reddit and Hacker News discussions of a URL. Returns threads sorted per the stored options, with links and per-source status."
    )]
    async fn find_discussions(&self, params: Parameters<FindDiscussionsParams>) -> Result<CallToolResult, McpError> {
        find_discussions::find_impl(&self.state, params.0).await
    }

    /// Report a tab event; a matching auto-search runs in the background.
    #[tool(
        description = "Report that a tab navigated (location_changed, with url) or was focused (became_active). Queues an automatic search whose result shows up in badge_status."
    )]
    async fn tab_event(&self, params: Parameters<TabEventParams>) -> Result<CallToolResult, McpError> {
        tab_event::tab_event_impl(&self.state, params.0).await
    }

    #[tool(description = "Current badge text and color for a tab.")]
    async fn badge_status(&self, params: Parameters<BadgeStatusParams>) -> Result<CallToolResult, McpError> {
        badge_status::badge_status_impl(&self.state, params.0).await
    }

    #[tool(description = "Drop all cached search results.")]
    async fn clear_cache(&self) -> Result<CallToolResult, McpError> {
        clear_cache::clear_impl(&self.state).await
    }

    #[tool(description = "Read the stored search and auto-search options.")]
    async fn get_options(&self) -> Result<CallToolResult, McpError> {
        options::get_impl(&self.state).await
    }

    #[tool(description = "Validate and store search and auto-search options.")]
    async fn set_options(&self, params: Parameters<SetOptionsParams>) -> Result<CallToolResult, McpError> {
        options::set_impl(&self.state, params.0).await
    }
}

impl ServerHandler for TabThreadsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "tabthreads".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::state;

    #[test]
    fn test_all_tools_registered() {
        let (state, _rx) = state("http://127.0.0.1:9");
        let server = TabThreadsServer::new(state);

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["badge_status", "clear_cache", "find_discussions", "get_options", "set_options", "tab_event"]
        );
    }
}
