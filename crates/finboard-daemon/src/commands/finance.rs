//! Finance overview and revenue list handlers.

use std::sync::Arc;

use finboard_types::revenue::ItemKind;
use serde_json::Value;
use tracing::{info, warn};

use crate::events::{Event, REVENUE_REFRESHED};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

pub(crate) fn to_value<T: serde::Serialize>(value: &T) -> Result {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// Fetch the overview and cache it.
pub async fn get_finance_overview(state: &Arc<DaemonState>) -> Result {
    state.dashboard.lock().await.overview.begin();

    match state.client.finance_overview().await {
        Ok(overview) => {
            let value = to_value(&overview)?;
            state.dashboard.lock().await.overview.succeed(Some(overview));
            Ok(value)
        }
        Err(e) => {
            warn!(error = %e, "failed to load finance overview");
            state.dashboard.lock().await.overview.fail(e.to_string());
            Err(e.into())
        }
    }
}

/// Events revenue; served from cache unless `refresh` is set.
pub async fn get_events_revenue(state: &Arc<DaemonState>, params: &Value) -> Result {
    revenue_list(state, ItemKind::Event, params).await
}

/// Awards revenue; served from cache unless `refresh` is set.
pub async fn get_awards_revenue(state: &Arc<DaemonState>, params: &Value) -> Result {
    revenue_list(state, ItemKind::Award, params).await
}

async fn revenue_list(state: &Arc<DaemonState>, kind: ItemKind, params: &Value) -> Result {
    let refresh = params
        .get("refresh")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    {
        let mut dashboard = state.dashboard.lock().await;
        let resource = dashboard.resource_mut(kind);
        if !refresh && !resource.needs_fetch() {
            return to_value(resource);
        }
        resource.begin();
    }

    load_items(state, kind).await?;
    let mut dashboard = state.dashboard.lock().await;
    to_value(dashboard.resource_mut(kind))
}

/// Fetch one list and store it. The resource must already be marked loading.
pub(crate) async fn load_items(
    state: &Arc<DaemonState>,
    kind: ItemKind,
) -> std::result::Result<usize, RpcError> {
    let fetched = match kind {
        ItemKind::Event => state.client.events_revenue().await,
        ItemKind::Award => state.client.awards_revenue().await,
    };

    let mut dashboard = state.dashboard.lock().await;
    match fetched {
        Ok(items) => {
            let count = items.len();
            let eligible = items.iter().filter(|i| i.is_eligible_for_payout).count();
            info!(%kind, count, eligible, "revenue list loaded");
            dashboard.replace_items(kind, items);
            Ok(count)
        }
        Err(e) => {
            warn!(%kind, error = %e, "failed to load revenue list");
            dashboard.resource_mut(kind).fail(e.to_string());
            Err(e.into())
        }
    }
}

/// Re-fetch overview, events and awards after a payout changed balances.
pub(crate) async fn refresh_all(state: &Arc<DaemonState>) {
    {
        let mut dashboard = state.dashboard.lock().await;
        dashboard.events.begin();
        dashboard.awards.begin();
    }

    let overview_ok = get_finance_overview(state).await.is_ok();
    let events = load_items(state, ItemKind::Event).await;
    let awards = load_items(state, ItemKind::Award).await;

    state.event_bus.emit(Event::now(
        REVENUE_REFRESHED,
        serde_json::json!({
            "overview": overview_ok,
            "events": events.ok(),
            "awards": awards.ok(),
        }),
    ));
}
