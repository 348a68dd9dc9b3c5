//! badge_status tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tabthreads_core::Error;

use crate::state::AppState;

/// Input parameters for badge_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BadgeStatusParams {
    pub surface_id: String,
}

/// Output structure for badge_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BadgeStatusOutput {
    pub surface_id: String,
    /// Badge text; empty when no badge is shown.
    pub text: String,
    /// "success" or "error", absent before the first badge write.
    pub color: Option<String>,
    /// Palette color as `#rrggbb`.
    pub color_hex: Option<String>,
}

/// Implementation of the badge_status tool.
pub async fn badge_status_impl(state: &AppState, params: BadgeStatusParams) -> Result<CallToolResult, McpError> {
    if params.surface_id.trim().is_empty() {
        return Err(Error::InvalidInput("surface_id cannot be empty".into()).into());
    }

    let badge = state.badges.get(&params.surface_id).await;
    let output = match badge {
        Some(badge) => BadgeStatusOutput {
            surface_id: params.surface_id,
            color: Some(badge.color.as_str().to_string()),
            color_hex: Some(badge.color.hex().to_string()),
            text: badge.text,
        },
        None => BadgeStatusOutput { surface_id: params.surface_id, text: String::new(), color: None, color_hex: None },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
