//! Finance overview returned by `GET /organizers/finance/overview`.

use serde::{Deserialize, Serialize};

use crate::{ItemId, Money};

/// Top-level overview payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct FinanceOverview {
    #[serde(default)]
    pub summary: FinanceSummary,
    #[serde(default)]
    pub revenue_breakdown: RevenueBreakdown,
    #[serde(default)]
    pub top_performers: TopPerformers,
}

/// Headline balances for the organizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct FinanceSummary {
    #[serde(default)]
    #[ts(type = "number")]
    pub total_revenue: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub platform_fees: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub net_revenue: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub total_paid_out: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub pending_payouts: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub available_balance: Money,
}

/// Revenue split by source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct RevenueBreakdown {
    #[serde(default)]
    pub events: SourceBreakdown,
    #[serde(default)]
    pub awards: SourceBreakdown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct SourceBreakdown {
    #[serde(default)]
    #[ts(type = "number")]
    pub gross_revenue: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub platform_fees: Money,
    #[serde(default)]
    #[ts(type = "number")]
    pub net_revenue: Money,
    #[serde(default)]
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct TopPerformers {
    #[serde(default)]
    pub events: Vec<Performer>,
    #[serde(default)]
    pub awards: Vec<Performer>,
}

/// One entry of a top-performers list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Performer {
    pub id: ItemId,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    #[ts(type = "number")]
    pub net_revenue: Money,
}
