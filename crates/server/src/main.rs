//! tabthreads server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tabthreads_client::Aggregator;
use tabthreads_client::autosearch::{BadgeBoard, Controller, SurfaceRegistry, spawn_dispatcher};
use tabthreads_core::{AppConfig, KvStore, MemoryStore, PolicyStore, ScopedStore, SqliteStore, TtlCache};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod state;
mod tools;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(db_path = %config.db_path.display(), "Starting tabthreads server on stdio transport");

    let synced = SqliteStore::open(&config.db_path).await?;
    let store: Arc<dyn KvStore> = Arc::new(ScopedStore::new(Arc::new(MemoryStore::new()), Arc::new(synced)));

    let cache = TtlCache::new(store.clone());
    let policies = PolicyStore::new(store);
    let aggregator = Aggregator::from_config(&config, cache.clone())?;
    let badges = Arc::new(BadgeBoard::new());
    let surfaces = Arc::new(SurfaceRegistry::new());

    let controller = Arc::new(Controller::new(
        Arc::new(aggregator.clone()),
        badges.clone(),
        surfaces.clone(),
        policies.clone(),
    ));
    let (triggers, rx) = mpsc::channel(config.channel_capacity);
    let dispatcher = spawn_dispatcher(controller, rx);

    let state = state::AppState { aggregator, policies, cache, badges, surfaces, triggers };
    let handler = handler::TabThreadsServer::new(state);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;
    dispatcher.abort();

    Ok(())
}
