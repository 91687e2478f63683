//! # Agency Server
//!
//! Wires the agent store into the HTTP router and serves it.

use agency_core::{AgentStore, ThreadRngSource, BUILD_INFO};
use agency_server::{create_router, AppState, ServiceConfig, StoreBackend};
use agent_store::{MemoryAgentStore, SqlAgentStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Agency Server {}", BUILD_INFO);

    let config = ServiceConfig::from_env()?;

    // The SQL handle is kept so the pool can be drained after serving stops.
    let (store, sql_store): (Arc<dyn AgentStore>, Option<SqlAgentStore>) = match config.backend {
        StoreBackend::Sqlite => {
            info!("Connecting to agent store...");
            let store = SqlAgentStore::connect(&config.database).await?;
            store.ensure_schema().await?;
            store.ping().await?;
            (Arc::new(store.clone()), Some(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory agent store; records are lost on exit");
            (Arc::new(MemoryAgentStore::new()), None)
        }
    };

    let state = AppState::new(store, Arc::new(ThreadRngSource));
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Agency Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = sql_store {
        store.close().await;
    }
    info!("Agency Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(err) => {
            error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await
        }
    }
}
