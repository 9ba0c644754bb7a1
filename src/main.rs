//! skyroute server entry point
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌──────────────┐    ┌──────────┐
//! │  Config  │───▶│  Document  │───▶│   Transfer   │───▶│  Gateway │
//! │  (YAML)  │    │   Store    │    │  Coordinator │    │  (axum)  │
//! └──────────┘    └────────────┘    └──────────────┘    └──────────┘
//! ```

use std::sync::Arc;

use skyroute::config::AppConfig;
use skyroute::gateway::{self, AppState};
use skyroute::store::{DocumentStore, MemoryStore};
use skyroute::transfer::{RetryPolicy, TransferCoordinator};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = skyroute::logging::init_logging(&config);

    tracing::info!("Starting skyroute in {} env", env);

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

    if config.seed_demo_data {
        skyroute::seed::seed_demo_data(store.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("demo data seeding failed: {e}"))?;
    }

    let policy = RetryPolicy::from(&config.transfer);
    let coordinator = Arc::new(TransferCoordinator::new(store.clone(), policy));
    let state = Arc::new(AppState::new(store, coordinator));

    let port = get_port_override().unwrap_or(config.gateway.port);
    gateway::run_server(&config.gateway.host, port, state).await;

    Ok(())
}
