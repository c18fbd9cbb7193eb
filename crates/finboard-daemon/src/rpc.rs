//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! newline-delimited JSON-RPC calls to the command handlers. A connection
//! that calls `subscribe_events` additionally receives event notifications
//! on the same stream.

use std::path::PathBuf;
use std::sync::Arc;

use finboard_client::ClientError;
use finboard_payout::{SubmitError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::events::EventFilter;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    fn new(code: i32, message: &str, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.to_string(),
            data,
        }
    }

    // Standard JSON-RPC errors

    pub fn parse_error() -> Self {
        Self::new(-32700, "PARSE_ERROR", None)
    }

    pub fn invalid_request() -> Self {
        Self::new(-32600, "INVALID_REQUEST", None)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            -32601,
            "METHOD_NOT_FOUND",
            Some(serde_json::json!({"method": method})),
        )
    }

    pub fn invalid_params(detail: &str) -> Self {
        Self::new(
            -32602,
            "INVALID_PARAMS",
            Some(serde_json::json!({"detail": detail})),
        )
    }

    pub fn internal_error(detail: &str) -> Self {
        Self::new(
            -32603,
            "INTERNAL_ERROR",
            Some(serde_json::json!({"detail": detail})),
        )
    }

    // Finance errors

    /// Validation gate failed (-32050). `detail` is the user-facing message.
    pub fn validation_failed(err: &ValidationError) -> Self {
        Self::new(
            -32050,
            "VALIDATION_FAILED",
            Some(serde_json::json!({"detail": err.to_string()})),
        )
    }

    /// A payout request is already in flight (-32051).
    pub fn submission_in_progress() -> Self {
        Self::new(-32051, "SUBMISSION_IN_PROGRESS", None)
    }

    /// The payout modal is not open (-32052).
    pub fn modal_closed() -> Self {
        Self::new(-32052, "MODAL_CLOSED", None)
    }

    /// Toggle on an item outside the eligible list (-32053).
    pub fn item_not_selectable(detail: &str) -> Self {
        Self::new(
            -32053,
            "ITEM_NOT_SELECTABLE",
            Some(serde_json::json!({"detail": detail})),
        )
    }

    /// The finance API failed or answered with an error (-32054).
    pub fn upstream_error(detail: &str, status: Option<u16>) -> Self {
        Self::new(
            -32054,
            "UPSTREAM_ERROR",
            Some(serde_json::json!({"detail": detail, "status": status})),
        )
    }
}

impl From<SubmitError> for RpcError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(err) => Self::validation_failed(&err),
            SubmitError::Selection(err) => Self::item_not_selectable(&err.to_string()),
            SubmitError::InProgress => Self::submission_in_progress(),
            SubmitError::Closed => Self::modal_closed(),
        }
    }
}

impl From<ClientError> for RpcError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::Api { status, message } => Self::upstream_error(message, Some(*status)),
            ClientError::Build(_) => Self::internal_error(&err.to_string()),
            _ => Self::upstream_error(&err.to_string(), None),
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!(path = ?self.socket_path, "IPC server listening");

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!(error = %e, "connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "accept error");
                }
            }
        }
    }
}

/// Handle a single client connection.
///
/// Responses and event notifications share one writer task so that lines
/// never interleave.
async fn handle_connection(state: Arc<DaemonState>, stream: UnixStream) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let (out_tx, mut out_rx) = mpsc::channel::<String>(64);

    let writer_task = tokio::spawn(async move {
        while let Some(mut line) = out_rx.recv().await {
            line.push('\n');
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut subscription: Option<JoinHandle<()>> = None;
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => match request.method.as_str() {
                "subscribe_events" => {
                    subscribe(&state, &request, &out_tx, &mut subscription)
                }
                "unsubscribe_events" => {
                    let was_active = match subscription.take() {
                        Some(task) => {
                            task.abort();
                            true
                        }
                        None => false,
                    };
                    RpcResponse::success(
                        request.id,
                        serde_json::json!({"unsubscribed": was_active}),
                    )
                }
                _ => dispatch_request(state.clone(), request).await,
            },
            Err(_) => RpcResponse::error(Value::Null, RpcError::parse_error()),
        };

        if out_tx.send(serde_json::to_string(&response)?).await.is_err() {
            break;
        }
    }

    if let Some(task) = subscription.take() {
        task.abort();
    }
    drop(out_tx);
    let _ = writer_task.await;
    Ok(())
}

/// Start forwarding events matching the request's filter to this connection.
///
/// A second subscribe replaces the first.
fn subscribe(
    state: &Arc<DaemonState>,
    request: &RpcRequest,
    out_tx: &mpsc::Sender<String>,
    subscription: &mut Option<JoinHandle<()>>,
) -> RpcResponse {
    let filter = match request.params.get("filter") {
        None | Some(Value::Null) => EventFilter::default(),
        Some(raw) => match serde_json::from_value::<EventFilter>(raw.clone()) {
            Ok(filter) => filter,
            Err(e) => {
                return RpcResponse::error(
                    request.id.clone(),
                    RpcError::invalid_params(&format!("invalid filter: {e}")),
                )
            }
        },
    };

    if let Some(previous) = subscription.take() {
        previous.abort();
    }

    let mut events = state.event_bus.subscribe();
    let out_tx = out_tx.clone();
    *subscription = Some(tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if !filter.matches(&event) {
                        continue;
                    }
                    let notification = serde_json::json!({
                        "jsonrpc": "2.0",
                        "method": "event",
                        "params": event,
                    });
                    if out_tx.send(notification.to_string()).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }));

    debug!("event subscription started");
    RpcResponse::success(
        request.id.clone(),
        serde_json::json!({"subscribed": true, "sequence": state.event_bus.sequence()}),
    )
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
pub(crate) async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    if request.jsonrpc != "2.0" {
        return RpcResponse::error(id, RpcError::invalid_request());
    }

    let method = request.method.as_str();
    let params = &request.params;
    debug!(method, "dispatching RPC method");

    let result = match method {
        // Finance overview and revenue lists
        "get_finance_overview" => commands::finance::get_finance_overview(&state).await,
        "get_events_revenue" => commands::finance::get_events_revenue(&state, params).await,
        "get_awards_revenue" => commands::finance::get_awards_revenue(&state, params).await,

        // Payout modal
        "open_payout_modal" => commands::payout::open_payout_modal(&state).await,
        "close_payout_modal" => commands::payout::close_payout_modal(&state).await,
        "set_source_filter" => commands::payout::set_source_filter(&state, params).await,
        "get_eligible_items" => commands::payout::get_eligible_items(&state).await,
        "toggle_payout_item" => commands::payout::toggle_payout_item(&state, params).await,
        "get_selected_total" => commands::payout::get_selected_total(&state).await,
        "update_payout_draft" => commands::payout::update_payout_draft(&state, params).await,
        "submit_payout_request" => commands::payout::submit_payout_request(&state).await,

        // Payout history
        "get_payout_history" => commands::payout::get_payout_history(&state, params).await,
        "get_payout" => commands::payout::get_payout(&state, params).await,

        // Diagnostics
        "get_daemon_info" => commands::diagnostics::get_daemon_info(&state).await,
        "shutdown" => commands::diagnostics::shutdown(&state).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => {
            debug!(method, code = err.code, "RPC method failed");
            RpcResponse::error(id, err)
        }
    }
}
