//! Diagnostics command handlers.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Version, upstream and cache status.
pub async fn get_daemon_info(state: &Arc<DaemonState>) -> Result {
    let dashboard = state.dashboard.lock().await;
    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "api_base_url": state.client.base_url(),
        "currency": dashboard.currency(),
        "overview_state": dashboard.overview.state,
        "events_state": dashboard.events.state,
        "awards_state": dashboard.awards.state,
        "payout_modal_open": dashboard.form.is_open(),
        "event_sequence": state.event_bus.sequence(),
    }))
}

/// Ask the daemon to exit.
pub async fn shutdown(state: &Arc<DaemonState>) -> Result {
    info!("shutdown requested over IPC");
    let _ = state.shutdown_tx.send(());
    Ok(serde_json::json!({"shutting_down": true}))
}
