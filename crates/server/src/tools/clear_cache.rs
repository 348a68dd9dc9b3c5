//! clear_cache tool implementation.
//!
//! Drops every cached search result. Stored options are untouched.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tabthreads_core::Error;

use crate::state::AppState;

/// Output from the clear_cache tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClearCacheOutput {
    pub cleared: bool,
}

/// Implementation of the clear_cache tool.
pub async fn clear_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    state.cache.clear().await?;
    tracing::info!("session cache cleared");

    let output = ClearCacheOutput { cleared: true };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{output_text, state};
    use tabthreads_core::AutoSearchConfig;

    #[tokio::test]
    async fn test_clear_keeps_options() {
        let (state, _rx) = state("http://127.0.0.1:9");
        state.cache.put("reddit:example.com", &vec![1, 2, 3]).await.unwrap();

        let mut policy = AutoSearchConfig::default();
        policy.cache.period_minutes = 5;
        state.policies.save(&policy).await.unwrap();

        let result = clear_impl(&state).await.unwrap();
        let output: ClearCacheOutput = serde_json::from_str(&output_text(&result)).unwrap();
        assert!(output.cleared);

        assert!(state.cache.get::<Vec<i32>>("reddit:example.com").await.unwrap().is_none());
        assert_eq!(state.policies.load().await.unwrap().cache.period_minutes, 5);
    }
}
