//! finboard-daemon: backend for the organizer finance page.
//!
//! Single OS process running a Tokio async runtime. It holds the finance
//! dashboard state, talks to the finance API, and serves the UI over
//! JSON-RPC on a Unix socket.

mod commands;
mod config;
mod dashboard;
mod events;
mod rpc;

use std::sync::Arc;

use finboard_client::{build_http_client, FinanceClient};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info};

use crate::config::DaemonConfig;
use crate::dashboard::Dashboard;
use crate::events::{Event, EventBus, DAEMON_STARTED};
use crate::rpc::RpcServer;

/// Daemon-wide shared state.
pub struct DaemonState {
    pub config: DaemonConfig,
    /// Finance API client.
    pub client: FinanceClient,
    /// Cached finance page and payout form.
    pub dashboard: Mutex<Dashboard>,
    /// Event bus for pushing events to subscribers.
    pub event_bus: EventBus,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl DaemonState {
    pub fn new(config: DaemonConfig, client: FinanceClient) -> Self {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
        Self {
            dashboard: Mutex::new(Dashboard::new(&config.display.currency)),
            event_bus: EventBus::new(config.advanced.event_buffer),
            client,
            config,
            shutdown_tx,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("finboard={}", config.advanced.log_level).parse()?),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "finboard daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let http = build_http_client(config.api.timeout(), config.api.connect_timeout())?;
    let client = FinanceClient::new(&config.api.base_url, config.api.token(), http);
    info!(base_url = client.base_url(), "finance API configured");

    let socket_path = config.socket_path();
    let state = Arc::new(DaemonState::new(config, client));
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());

    state.event_bus.emit(Event::now(
        DAEMON_STARTED,
        serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        }),
    ));

    let mut shutdown_rx = state.shutdown_tx.subscribe();
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!(error = %e, "RPC server error");
            }
        }
        _ = shutdown_rx.recv() => {
            info!("shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    let _ = std::fs::remove_file(&socket_path);
    info!("daemon stopped");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use finboard_client::{build_http_client, FinanceClient};

    use crate::config::DaemonConfig;
    use crate::DaemonState;

    /// Daemon state with default config talking to `base_url`.
    pub fn state_for(base_url: &str) -> Arc<DaemonState> {
        let http = build_http_client(Duration::from_secs(5), Duration::from_secs(1))
            .expect("http client");
        let client = FinanceClient::new(base_url, None, http);
        Arc::new(DaemonState::new(DaemonConfig::default(), client))
    }
}
