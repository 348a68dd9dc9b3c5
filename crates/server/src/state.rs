//! Shared state handed to every tool.

use std::sync::Arc;

use tabthreads_client::autosearch::{BadgeBoard, SurfaceRegistry, Trigger};
use tabthreads_client::Aggregator;
use tabthreads_core::{PolicyStore, TtlCache};
use tokio::sync::mpsc;

pub struct AppState {
    pub aggregator: Aggregator,
    pub policies: PolicyStore,
    pub cache: TtlCache,
    pub badges: Arc<BadgeBoard>,
    pub surfaces: Arc<SurfaceRegistry>,
    pub triggers: mpsc::Sender<Trigger>,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tabthreads_core::{AppConfig, KvStore, MemoryStore};

    /// State over in-memory stores whose backends point at `base_url`.
    pub fn state(base_url: &str) -> (AppState, mpsc::Receiver<Trigger>) {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let cache = TtlCache::new(store.clone());
        let config = AppConfig {
            reddit_info_url: format!("{base_url}/api/info.json"),
            reddit_api_url: base_url.to_string(),
            hn_search_url: format!("{base_url}/hn/search"),
            ..Default::default()
        };
        let (triggers, rx) = mpsc::channel(4);

        let state = AppState {
            aggregator: Aggregator::from_config(&config, cache.clone()).unwrap(),
            policies: PolicyStore::new(store),
            cache,
            badges: Arc::new(BadgeBoard::new()),
            surfaces: Arc::new(SurfaceRegistry::new()),
            triggers,
        };
        (state, rx)
    }

    /// The JSON text of the first content item.
    pub fn output_text(result: &rmcp::model::CallToolResult) -> String {
        let content = serde_json::to_value(&result.content[0]).unwrap();
        content.get("text").and_then(|v| v.as_str()).expect("Expected text field in content").to_string()
    }
}
