//! get_options / set_options tool implementations.
//!
//! The options are the persisted policy snapshot every auto-search and
//! lookup reads.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tabthreads_core::{AutoSearchConfig, Error};

use crate::state::AppState;

/// Input parameters for set_options tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetOptionsParams {
    /// Complete options; omitted fields take their defaults.
    pub options: AutoSearchConfig,
}

fn options_result(options: &AutoSearchConfig) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(options)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Implementation of the get_options tool.
pub async fn get_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let options = state.policies.load().await?;
    options_result(&options)
}

/// Implementation of the set_options tool.
pub async fn set_impl(state: &AppState, params: SetOptionsParams) -> Result<CallToolResult, McpError> {
    state.policies.save(&params.options).await?;
    tracing::info!("options updated");
    options_result(&params.options)
}
