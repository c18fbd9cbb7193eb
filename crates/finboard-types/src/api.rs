//! Response envelopes shared by the REST endpoints.

use serde::{Deserialize, Serialize};

use crate::payout::PayoutRecord;
use crate::revenue::RevenueLineItem;

/// `{ success, data?, message? }` wrapper used by every read endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` of `GET /organizers/finance/events`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventsRevenue {
    #[serde(default)]
    pub events: Vec<RevenueLineItem>,
}

/// `data` of `GET /organizers/finance/awards`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AwardsRevenue {
    #[serde(default)]
    pub awards: Vec<RevenueLineItem>,
}

/// `data` of `GET /organizers/payouts/:id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayoutDetail {
    pub payout: PayoutRecord,
}
