//! Revenue line items returned by the events and awards revenue endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ItemId, Money, ParseEnumError};

/// Which revenue source a line item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Event,
    Award,
}

impl ItemKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Award => "award",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" | "events" => Ok(Self::Event),
            "award" | "awards" => Ok(Self::Award),
            other => Err(ParseEnumError::new("item kind", other)),
        }
    }
}

/// A revenue-bearing event or award.
///
/// `is_eligible_for_payout` is computed server-side: true once the item is
/// past its holding period and has not been paid out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct RevenueLineItem {
    pub id: ItemId,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default, alias = "event_date", alias = "ceremony_date")]
    pub date: Option<String>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub net_revenue: Option<Money>,
    #[serde(default)]
    pub is_eligible_for_payout: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub gross_revenue: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub platform_fee: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_sold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes_count: Option<u64>,
}

impl RevenueLineItem {
    /// Net revenue, with a missing value counted as zero.
    pub fn net_revenue_or_zero(&self) -> Money {
        self.net_revenue.unwrap_or(Money::ZERO)
    }
}

/// View filter over the selectable pool of eligible items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SourceFilter {
    #[default]
    All,
    EventsOnly,
    AwardsOnly,
}

impl SourceFilter {
    /// Whether items of `kind` are visible under this filter.
    pub fn shows(&self, kind: ItemKind) -> bool {
        match self {
            Self::All => true,
            Self::EventsOnly => kind == ItemKind::Event,
            Self::AwardsOnly => kind == ItemKind::Award,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "events" | "events_only" => Ok(Self::EventsOnly),
            "awards" | "awards_only" => Ok(Self::AwardsOnly),
            other => Err(ParseEnumError::new("source filter", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_from_wire() {
        let item: RevenueLineItem = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Homecoming Gala",
            "event_date": "2026-09-01",
            "net_revenue": "1250.50",
            "is_eligible_for_payout": true,
            "tickets_sold": 310
        }))
        .expect("deserialize");

        assert_eq!(item.id, 7);
        assert_eq!(item.date.as_deref(), Some("2026-09-01"));
        assert_eq!(item.net_revenue_or_zero(), Money::new(125050, 2));
        assert!(item.is_eligible_for_payout);
        assert_eq!(item.tickets_sold, Some(310));
    }

    #[test]
    fn test_missing_revenue_is_zero() {
        let item: RevenueLineItem =
            serde_json::from_value(serde_json::json!({"id": 1, "net_revenue": null}))
                .expect("deserialize");
        assert_eq!(item.net_revenue_or_zero(), Money::ZERO);
        assert!(!item.is_eligible_for_payout);
    }

    #[test]
    fn test_numeric_revenue_accepted() {
        let item: RevenueLineItem =
            serde_json::from_value(serde_json::json!({"id": 1, "net_revenue": 100}))
                .expect("deserialize");
        assert_eq!(item.net_revenue_or_zero(), Money::from(100));
    }

    #[test]
    fn test_source_filter_shows() {
        assert!(SourceFilter::All.shows(ItemKind::Event));
        assert!(SourceFilter::All.shows(ItemKind::Award));
        assert!(SourceFilter::EventsOnly.shows(ItemKind::Event));
        assert!(!SourceFilter::EventsOnly.shows(ItemKind::Award));
        assert!(!SourceFilter::AwardsOnly.shows(ItemKind::Event));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("events".parse::<SourceFilter>(), Ok(SourceFilter::EventsOnly));
        assert_eq!("award".parse::<ItemKind>(), Ok(ItemKind::Award));
        assert!("tickets".parse::<ItemKind>().is_err());
    }
}
