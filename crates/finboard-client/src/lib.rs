//! # finboard-client
//!
//! Typed HTTP client for the organizer finance API.
//!
//! Six operations are exposed: overview, events revenue, awards revenue,
//! payout request, payout history and payout detail. Read endpoints share
//! the `{ success, data, message }` envelope; the payout request endpoint
//! answers with its own shape, which is returned as-is so the caller can
//! classify partial acceptance.

use std::time::Duration;

use finboard_payout::PayoutGateway;
use finboard_types::api::{ApiEnvelope, AwardsRevenue, EventsRevenue, PayoutDetail};
use finboard_types::overview::FinanceOverview;
use finboard_types::payout::{PayoutPage, PayoutQuery, PayoutRecord, PayoutRequest, PayoutResponse};
use finboard_types::revenue::RevenueLineItem;
use finboard_types::PayoutId;
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Errors talking to the finance API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// The request never produced a response.
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The API answered but reported failure.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Convenience result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Build an HTTP client with the given timeouts.
pub fn build_http_client(timeout: Duration, connect_timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| ClientError::Build(e.to_string()))
}

/// Client for the `/organizers/...` endpoints.
#[derive(Clone, Debug)]
pub struct FinanceClient {
    base_url: String,
    api_token: Option<String>,
    client: Client,
}

impl FinanceClient {
    /// `base_url` is the API root, e.g. `https://api.example.com/api/v1`.
    pub fn new(base_url: &str, api_token: Option<String>, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, url: &str, builder: RequestBuilder) -> Result<(StatusCode, String)> {
        let resp = self
            .authorize(builder)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok((status, body))
    }

    /// GET an enveloped resource and return its `data`.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&PayoutQuery>,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");

        let mut builder = self.client.get(&url);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let (status, body) = self.send(&url, builder).await?;

        let envelope: ApiEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(ClientError::Decode {
                    url,
                    reason: e.to_string(),
                })
            }
            Err(_) => return Err(status_error(status, None)),
        };

        if !status.is_success() || !envelope.success {
            warn!(%url, status = status.as_u16(), "finance API reported failure");
            return Err(status_error(status, envelope.message));
        }

        envelope.data.ok_or_else(|| ClientError::Decode {
            url,
            reason: "missing data".to_string(),
        })
    }

    /// `GET /organizers/finance/overview`
    pub async fn finance_overview(&self) -> Result<FinanceOverview> {
        self.get_data("/organizers/finance/overview", None).await
    }

    /// `GET /organizers/finance/events`
    pub async fn events_revenue(&self) -> Result<Vec<RevenueLineItem>> {
        let data: EventsRevenue = self.get_data("/organizers/finance/events", None).await?;
        Ok(data.events)
    }

    /// `GET /organizers/finance/awards`
    pub async fn awards_revenue(&self) -> Result<Vec<RevenueLineItem>> {
        let data: AwardsRevenue = self.get_data("/organizers/finance/awards", None).await?;
        Ok(data.awards)
    }

    /// `GET /organizers/payouts`
    pub async fn payouts(&self, query: &PayoutQuery) -> Result<PayoutPage> {
        self.get_data("/organizers/payouts", Some(query)).await
    }

    /// `GET /organizers/payouts/:id`
    pub async fn payout(&self, id: PayoutId) -> Result<PayoutRecord> {
        let data: PayoutDetail = self
            .get_data(&format!("/organizers/payouts/{id}"), None)
            .await?;
        Ok(data.payout)
    }

    /// `POST /organizers/payouts/request`
    ///
    /// A rejection carried in a well-formed body (any status) is returned as
    /// a [`PayoutResponse`] with `success == false`, not as an error.
    pub async fn request_payout(&self, request: &PayoutRequest) -> Result<PayoutResponse> {
        let url = self.url("/organizers/payouts/request");
        debug!(%url, items = request.item_count(), "POST payout request");

        let (status, body) = self.send(&url, self.client.post(&url).json(request)).await?;

        match serde_json::from_str::<PayoutResponse>(&body) {
            Ok(response) => {
                if !status.is_success() {
                    warn!(status = status.as_u16(), "payout request rejected");
                }
                Ok(response)
            }
            Err(e) if status.is_success() => Err(ClientError::Decode {
                url,
                reason: e.to_string(),
            }),
            Err(_) => Err(status_error(status, None)),
        }
    }
}

impl PayoutGateway for FinanceClient {
    type Error = ClientError;

    async fn request_payout(&self, request: &PayoutRequest) -> Result<PayoutResponse> {
        FinanceClient::request_payout(self, request).await
    }
}

fn status_error(status: StatusCode, message: Option<String>) -> ClientError {
    ClientError::Api {
        status: status.as_u16(),
        message: message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("finance API returned {status}")),
    }
}

#[cfg(test)]
mod tests {
    use finboard_types::payout::{PaymentDetailsWire, PaymentMethod, PayoutLine, PayoutStatus};
    use finboard_types::Money;
    use mockito::{Matcher, Server};

    use super::*;

    fn client(server: &Server, token: Option<&str>) -> FinanceClient {
        let http = build_http_client(Duration::from_secs(5), Duration::from_secs(5))
            .expect("build client");
        FinanceClient::new(&format!("{}/", server.url()), token.map(str::to_string), http)
    }

    fn mobile_request() -> PayoutRequest {
        PayoutRequest {
            events: vec![PayoutLine {
                id: 1,
                amount: Money::from(100),
            }],
            awards: vec![],
            payment_method: PaymentMethod::MobileMoney,
            payment_details: PaymentDetailsWire::MobileMoney {
                mobile_network: "MTN Mobile Money".to_string(),
                mobile_number: "0244000000".to_string(),
                account_name: "Jane Doe".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn fetches_overview_with_bearer_token() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/organizers/finance/overview")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":{"summary":{"available_balance":"250.00"},"revenue_breakdown":{},"top_performers":{}}}"#,
            )
            .create_async()
            .await;

        let overview = client(&server, Some("secret"))
            .finance_overview()
            .await
            .expect("overview");
        assert_eq!(overview.summary.available_balance, Money::from(250));
    }

    #[tokio::test]
    async fn fetches_events_and_awards() {
        let mut server = Server::new_async().await;
        let _events = server
            .mock("GET", "/organizers/finance/events")
            .with_status(200)
            .with_body(
                r#"{"success":true,"data":{"events":[{"id":1,"title":"Gala","net_revenue":100,"is_eligible_for_payout":true}]}}"#,
            )
            .create_async()
            .await;
        let _awards = server
            .mock("GET", "/organizers/finance/awards")
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"awards":[]}}"#)
            .create_async()
            .await;

        let api = client(&server, None);
        let events = api.events_revenue().await.expect("events");
        assert_eq!(events.len(), 1);
        assert!(events[0].is_eligible_for_payout);
        assert!(api.awards_revenue().await.expect("awards").is_empty());
    }

    #[tokio::test]
    async fn envelope_failure_becomes_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/organizers/finance/events")
            .with_status(401)
            .with_body(r#"{"success":false,"message":"Unauthenticated."}"#)
            .create_async()
            .await;

        let err = client(&server, None)
            .events_revenue()
            .await
            .expect_err("unauthenticated");
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthenticated.");
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_uses_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/organizers/finance/awards")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let err = client(&server, None)
            .awards_revenue()
            .await
            .expect_err("bad gateway");
        assert!(err.to_string().contains("502"), "{err}");
    }

    #[tokio::test]
    async fn posts_payout_request_in_wire_shape() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/organizers/payouts/request")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "awards": [],
                "payment_method": "mobile_money",
                "payment_details": {
                    "mobile_network": "MTN Mobile Money",
                    "mobile_number": "0244000000",
                    "account_name": "Jane Doe"
                }
            })))
            .with_status(200)
            .with_body(r#"{"success":true,"events":[{"id":1,"payout_id":77}],"awards":[],"errors":[]}"#)
            .create_async()
            .await;

        let response = client(&server, None)
            .request_payout(&mobile_request())
            .await
            .expect("response");
        assert!(response.success);
        assert_eq!(response.events[0].payout_id, Some(77));
    }

    #[tokio::test]
    async fn rejected_payout_body_is_not_an_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/organizers/payouts/request")
            .with_status(422)
            .with_body(r#"{"success":false,"events":[],"awards":[],"errors":[{"error":"bank declined"}]}"#)
            .create_async()
            .await;

        let response = client(&server, None)
            .request_payout(&mobile_request())
            .await
            .expect("response");
        assert!(!response.success);
        assert_eq!(response.first_error(), Some("bank declined"));
    }

    #[tokio::test]
    async fn lists_payouts_with_query() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/organizers/payouts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("status".to_string(), "pending".to_string()),
                Matcher::UrlEncoded("page".to_string(), "2".to_string()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"success":true,"data":{"payouts":[{"id":5,"amount":"80.00","status":"pending","payment_method":"bank_transfer"}],"pagination":{"current_page":2,"per_page":15,"total":16,"last_page":2}}}"#,
            )
            .create_async()
            .await;

        let page = client(&server, None)
            .payouts(&PayoutQuery {
                status: Some(PayoutStatus::Pending),
                page: Some(2),
                per_page: None,
            })
            .await
            .expect("payouts");
        assert_eq!(page.payouts.len(), 1);
        assert_eq!(page.payouts[0].payment_method, Some(PaymentMethod::BankTransfer));
        assert_eq!(page.pagination.total, 16);
    }

    #[tokio::test]
    async fn fetches_single_payout() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/organizers/payouts/5")
            .with_status(200)
            .with_body(r#"{"success":true,"data":{"payout":{"id":5,"amount":80,"status":"completed"}}}"#)
            .create_async()
            .await;

        let record = client(&server, None).payout(5).await.expect("payout");
        assert_eq!(record.id, 5);
        assert_eq!(record.status, PayoutStatus::Completed);
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let http = build_http_client(Duration::from_secs(2), Duration::from_secs(2))
            .expect("build client");
        let api = FinanceClient::new("http://127.0.0.1:9", None, http);
        let err = api.finance_overview().await.expect_err("no server");
        assert!(matches!(err, ClientError::Transport { .. }));
    }
}
