//! tab_event tool implementation.
//!
//! Records where a surface is and queues a trigger for the auto-search
//! dispatcher. Returns as soon as the trigger is queued.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tabthreads_client::Trigger;
use tabthreads_core::Error;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TabEventKind {
    /// The surface navigated; `url` is required.
    LocationChanged,
    /// The surface was focused; its last recorded URL is searched.
    BecameActive,
}

/// Input parameters for tab_event tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TabEventParams {
    /// Identifier of the tab or window.
    pub surface_id: String,
    pub kind: TabEventKind,
    /// Current URL of the surface.
    #[serde(default)]
    pub url: Option<String>,
}

/// Output structure for tab_event tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TabEventOutput {
    pub surface_id: String,
    pub queued: bool,
}

/// Implementation of the tab_event tool.
pub async fn tab_event_impl(state: &AppState, params: TabEventParams) -> Result<CallToolResult, McpError> {
    let surface = params.surface_id.trim().to_string();
    if surface.is_empty() {
        return Err(Error::InvalidInput("surface_id cannot be empty".into()).into());
    }

    let url = params.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    if let Some(url) = &url {
        state.surfaces.record(&surface, url).await;
    }

    let trigger = match (params.kind, url) {
        (TabEventKind::LocationChanged, Some(url)) => Trigger::LocationChanged { surface: surface.clone(), url },
        (TabEventKind::LocationChanged, None) => {
            return Err(Error::InvalidInput("url is required for location_changed".into()).into());
        }
        (TabEventKind::BecameActive, _) => Trigger::BecameActive { surface: surface.clone() },
    };

    tracing::debug!(surface = %trigger.surface(), kind = ?params.kind, "queueing trigger");

    state.triggers.try_send(trigger).map_err(|e| match e {
        TrySendError::Full(_) => ServerError::QueueFull("too many pending tab events".into()),
        TrySendError::Closed(_) => ServerError::DispatcherStopped("auto-search dispatcher is not running".into()),
    })?;

    let output = TabEventOutput { surface_id: surface, queued: true };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
