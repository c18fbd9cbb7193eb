//! Payout modal and payout history handlers.

use std::str::FromStr;
use std::sync::Arc;

use finboard_payout::details::PaymentDetails;
use finboard_payout::SubmissionOutcome;
use finboard_types::payout::{PaymentMethod, PayoutQuery, PayoutStatus};
use finboard_types::revenue::{ItemKind, SourceFilter};
use serde_json::Value;
use tracing::{info, warn};

use crate::commands::finance::{load_items, refresh_all, to_value};
use crate::events::{Event, PAYOUT_FAILED, PAYOUT_PARTIALLY_FAILED, PAYOUT_REQUESTED};
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

fn str_param<'a>(params: &'a Value, name: &str) -> std::result::Result<&'a str, RpcError> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{name} required")))
}

fn parse_param<T: FromStr>(params: &Value, name: &str) -> std::result::Result<T, RpcError>
where
    T::Err: std::fmt::Display,
{
    str_param(params, name)?
        .parse()
        .map_err(|e: T::Err| RpcError::invalid_params(&e.to_string()))
}

fn u32_param(params: &Value, name: &str) -> std::result::Result<Option<u32>, RpcError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => raw
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| RpcError::invalid_params(&format!("{name} out of range"))),
    }
}

async fn modal_view(state: &Arc<DaemonState>) -> Result {
    let dashboard = state.dashboard.lock().await;
    to_value(&dashboard.modal_view())
}

/// Open the modal with a fresh draft and fetch any list not loaded yet.
pub async fn open_payout_modal(state: &Arc<DaemonState>) -> Result {
    let missing = state.dashboard.lock().await.open_modal();

    for kind in &missing {
        let state = state.clone();
        let kind = *kind;
        tokio::spawn(async move {
            if let Err(e) = load_items(&state, kind).await {
                warn!(%kind, code = e.code, "background revenue fetch failed");
            }
        });
    }

    let mut view = modal_view(state).await?;
    view["loading"] = serde_json::json!(missing);
    Ok(view)
}

/// Close the modal and discard the draft. Ignored while submitting.
pub async fn close_payout_modal(state: &Arc<DaemonState>) -> Result {
    state.dashboard.lock().await.form.close();
    modal_view(state).await
}

/// Params: `filter` = "all" | "events" | "awards".
pub async fn set_source_filter(state: &Arc<DaemonState>, params: &Value) -> Result {
    let filter: SourceFilter = parse_param(params, "filter")?;
    state.dashboard.lock().await.form.set_filter(filter)?;
    modal_view(state).await
}

/// Eligible items under the current filter.
pub async fn get_eligible_items(state: &Arc<DaemonState>) -> Result {
    let dashboard = state.dashboard.lock().await;
    to_value(&dashboard.eligible())
}

/// Params: `kind` = "event" | "award", `id`.
pub async fn toggle_payout_item(state: &Arc<DaemonState>, params: &Value) -> Result {
    let kind: ItemKind = parse_param(params, "kind")?;
    let id = params
        .get("id")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| RpcError::invalid_params("id required"))?;

    let mut dashboard = state.dashboard.lock().await;
    let selected = dashboard.toggle_item(kind, id)?;
    Ok(serde_json::json!({
        "selected": selected,
        "selection": to_value(&dashboard.form.draft().selection)?,
        "selected_total": to_value(&dashboard.selected_total())?,
    }))
}

pub async fn get_selected_total(state: &Arc<DaemonState>) -> Result {
    let dashboard = state.dashboard.lock().await;
    to_value(&dashboard.selected_total())
}

/// Params (all optional): `amount`, `payment_method`, `payment_details`.
///
/// A method change is applied before details so that details for the new
/// method can be sent in the same call.
pub async fn update_payout_draft(state: &Arc<DaemonState>, params: &Value) -> Result {
    let method = match params.get("payment_method").and_then(|v| v.as_str()) {
        Some(raw) => Some(
            PaymentMethod::from_str(raw).map_err(|e| RpcError::invalid_params(&e.to_string()))?,
        ),
        None => None,
    };
    let details = match params.get("payment_details") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<PaymentDetails>(raw.clone())
                .map_err(|e| RpcError::invalid_params(&format!("payment_details: {e}")))?,
        ),
    };
    let amount = match params.get("amount") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => return Err(RpcError::invalid_params("amount must be a string or number")),
    };

    {
        let mut dashboard = state.dashboard.lock().await;
        if let Some(method) = method {
            dashboard.form.set_payment_method(method)?;
        }
        if let Some(details) = details {
            dashboard.form.set_payment_details(details)?;
        }
        if let Some(amount) = amount {
            dashboard.form.set_amount(amount)?;
        }
    }
    modal_view(state).await
}

/// Validate and send the draft.
///
/// The dashboard lock is released while the request is in flight; the form
/// stays in `Submitting` meanwhile so a second submit is refused.
pub async fn submit_payout_request(state: &Arc<DaemonState>) -> Result {
    let request = state.dashboard.lock().await.begin_submit()?;
    let items = request.item_count();

    let result = state.client.request_payout(&request).await;
    let outcome = state.dashboard.lock().await.finish_submit(result);

    match &outcome {
        SubmissionOutcome::Succeeded { accepted } => {
            state.event_bus.emit(Event::now(
                PAYOUT_REQUESTED,
                serde_json::json!({"accepted": accepted, "items": items}),
            ));
            let state = state.clone();
            tokio::spawn(async move {
                refresh_all(&state).await;
                info!("revenue refreshed after payout");
            });
        }
        SubmissionOutcome::PartiallyFailed {
            accepted,
            failed,
            errors,
        } => state.event_bus.emit(Event::now(
            PAYOUT_PARTIALLY_FAILED,
            serde_json::json!({"accepted": accepted, "failed": failed, "errors": errors}),
        )),
        SubmissionOutcome::Failed { message } => state.event_bus.emit(Event::now(
            PAYOUT_FAILED,
            serde_json::json!({"message": message}),
        )),
    }

    let mut value = to_value(&outcome)?;
    value["message"] = Value::String(outcome.message());
    Ok(value)
}

/// Params (all optional): `status`, `page`, `per_page`.
pub async fn get_payout_history(state: &Arc<DaemonState>, params: &Value) -> Result {
    let status = match params.get("status").and_then(|v| v.as_str()) {
        Some(raw) => Some(
            PayoutStatus::from_str(raw).map_err(|e| RpcError::invalid_params(&e.to_string()))?,
        ),
        None => None,
    };
    let page = u32_param(params, "page")?.map(|p| p.max(1));
    let per_page = u32_param(params, "per_page")?.unwrap_or(state.config.payout.default_per_page);
    let query = PayoutQuery {
        status,
        page,
        per_page: Some(per_page),
    };

    let page = state.client.payouts(&query).await?;
    to_value(&page)
}

/// Params: `id`.
pub async fn get_payout(state: &Arc<DaemonState>, params: &Value) -> Result {
    let id = params
        .get("id")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| RpcError::invalid_params("id required"))?;
    let payout = state.client.payout(id).await?;
    to_value(&payout)
}

#[cfg(test)]
mod tests {
    use finboard_types::revenue::RevenueLineItem;
    use finboard_types::Money;
    use mockito::Matcher;

    use crate::dashboard::LoadState;
    use crate::events::REVENUE_REFRESHED;
    use crate::test_support::state_for;

    use super::*;

    fn item(id: u64, net: i64) -> RevenueLineItem {
        RevenueLineItem {
            id,
            title: format!("item {id}"),
            date: None,
            net_revenue: Some(Money::from(net)),
            is_eligible_for_payout: true,
            gross_revenue: None,
            platform_fee: None,
            payout_status: None,
            tickets_sold: None,
            votes_count: None,
        }
    }

    async fn seeded_open_state(url: &str) -> Arc<DaemonState> {
        let state = state_for(url);
        {
            let mut dashboard = state.dashboard.lock().await;
            dashboard.replace_items(ItemKind::Event, vec![item(1, 100)]);
            dashboard.replace_items(ItemKind::Award, vec![item(9, 40)]);
            assert!(dashboard.open_modal().is_empty());
        }
        state
    }

    fn mobile_draft(amount: &str) -> Value {
        serde_json::json!({
            "amount": amount,
            "payment_details": {
                "payment_method": "mobile_money",
                "network": "MTN Mobile Money",
                "account_holder_name": "Jane Doe",
                "mobile_number": "0244000000"
            }
        })
    }

    #[tokio::test]
    async fn test_toggle_reports_total() {
        let state = seeded_open_state("http://127.0.0.1:9").await;
        let value = toggle_payout_item(&state, &serde_json::json!({"kind": "event", "id": 1}))
            .await
            .expect("toggle");
        assert_eq!(value["selected"], true);
        assert_eq!(value["selected_total"]["formatted_total"], "GH₵100.00");

        let err = toggle_payout_item(&state, &serde_json::json!({"kind": "event", "id": 7}))
            .await
            .expect_err("unknown id");
        assert_eq!(err.code, -32053);
    }

    #[tokio::test]
    async fn test_submit_validation_error_surfaces_message() {
        let state = seeded_open_state("http://127.0.0.1:9").await;
        toggle_payout_item(&state, &serde_json::json!({"kind": "event", "id": 1}))
            .await
            .expect("toggle");
        update_payout_draft(&state, &mobile_draft("150.00"))
            .await
            .expect("draft");

        let err = submit_payout_request(&state).await.expect_err("over limit");
        assert_eq!(err.code, -32050);
        assert_eq!(
            err.data,
            Some(serde_json::json!({
                "detail": "Amount exceeds available balance of GH₵100.00"
            }))
        );
    }

    #[tokio::test]
    async fn test_submit_success_emits_event() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/organizers/payouts/request")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "events": [{"id": 1, "amount": 100.0}],
                "awards": [],
                "payment_method": "mobile_money"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"events":[{"id":1,"payout_id":31}],"awards":[]}"#)
            .create_async()
            .await;

        let state = seeded_open_state(&server.url()).await;
        let mut events = state.event_bus.subscribe();
        toggle_payout_item(&state, &serde_json::json!({"kind": "event", "id": 1}))
            .await
            .expect("toggle");
        update_payout_draft(&state, &mobile_draft("100")).await.expect("draft");

        let value = submit_payout_request(&state).await.expect("submit");
        assert_eq!(value["outcome"], "succeeded");
        assert_eq!(value["message"], "1 payout request(s) submitted successfully");
        mock.assert_async().await;

        let event = events.recv().await.expect("event");
        assert_eq!(event.event_type, PAYOUT_REQUESTED);
        assert!(!state.dashboard.lock().await.form.is_open());
    }

    #[tokio::test]
    async fn test_successful_submit_refreshes_revenue() {
        let mut server = mockito::Server::new_async().await;
        let payout = server
            .mock("POST", "/organizers/payouts/request")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"events":[{"id":1,"payout_id":32}],"awards":[]}"#)
            .expect(1)
            .create_async()
            .await;
        let overview = server
            .mock("GET", "/organizers/finance/overview")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":{"summary":{"available_balance":"40.00","pending_payouts":"100.00"}}}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let events_list = server
            .mock("GET", "/organizers/finance/events")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":{"events":[
                    {"id":1,"title":"Gala","net_revenue":100,"is_eligible_for_payout":false},
                    {"id":3,"title":"Rave","net_revenue":25,"is_eligible_for_payout":true}
                ]}}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let awards_list = server
            .mock("GET", "/organizers/finance/awards")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":{"awards":[]}}"#)
            .expect(1)
            .create_async()
            .await;

        let state = seeded_open_state(&server.url()).await;
        let mut events = state.event_bus.subscribe();
        toggle_payout_item(&state, &serde_json::json!({"kind": "event", "id": 1}))
            .await
            .expect("toggle");
        update_payout_draft(&state, &mobile_draft("100")).await.expect("draft");
        submit_payout_request(&state).await.expect("submit");

        let refreshed = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            loop {
                let event = events.recv().await.expect("event");
                if event.event_type == REVENUE_REFRESHED {
                    return event;
                }
            }
        })
        .await
        .expect("refresh event");
        assert_eq!(refreshed.payload["overview"], true);
        assert_eq!(refreshed.payload["events"], 2);
        assert_eq!(refreshed.payload["awards"], 0);

        {
            let dashboard = state.dashboard.lock().await;
            let ids: Vec<u64> = dashboard.events.data.iter().map(|i| i.id).collect();
            assert_eq!(ids, vec![1, 3]);
            assert!(!dashboard.events.data[0].is_eligible_for_payout);
            assert!(dashboard.awards.data.is_empty());
            assert_eq!(dashboard.overview.state, LoadState::Loaded);
            let summary = &dashboard.overview.data.as_ref().expect("overview").summary;
            assert_eq!(summary.available_balance, Money::from(40));
        }

        payout.assert_async().await;
        overview.assert_async().await;
        events_list.assert_async().await;
        awards_list.assert_async().await;
    }

    #[tokio::test]
    async fn test_closed_modal_rejects_draft_update() {
        let state = state_for("http://127.0.0.1:9");
        let err = update_payout_draft(&state, &serde_json::json!({"amount": "5"}))
            .await
            .expect_err("closed");
        assert_eq!(err.code, -32052);
    }

    #[tokio::test]
    async fn test_history_uses_default_page_size() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/organizers/payouts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("status".into(), "pending".into()),
                Matcher::UrlEncoded("per_page".into(), "15".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"success":true,"data":{"payouts":[],"pagination":{"current_page":1,"per_page":15,"total":0,"last_page":1}}}"#,
            )
            .create_async()
            .await;

        let state = state_for(&server.url());
        let value = get_payout_history(&state, &serde_json::json!({"status": "pending"}))
            .await
            .expect("history");
        assert_eq!(value["pagination"]["per_page"], 15);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_history_rejects_out_of_range_paging() {
        let state = state_for("http://127.0.0.1:9");
        let err = get_payout_history(&state, &serde_json::json!({"per_page": 4_294_967_296u64}))
            .await
            .expect_err("per_page too large");
        assert_eq!(err.code, -32602);

        let err = get_payout_history(&state, &serde_json::json!({"page": -1}))
            .await
            .expect_err("negative page");
        assert_eq!(err.code, -32602);
    }
}
