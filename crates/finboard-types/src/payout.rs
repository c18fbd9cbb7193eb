//! Payout request, response and history types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ItemId, Money, ParseEnumError, PayoutId};

/// How the organizer wants to be paid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    MobileMoney,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MobileMoney => "mobile_money",
            Self::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile_money" => Ok(Self::MobileMoney),
            "bank_transfer" => Ok(Self::BankTransfer),
            other => Err(ParseEnumError::new("payment method", other)),
        }
    }
}

/// One referenced item in a payout request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PayoutLine {
    pub id: ItemId,
    #[ts(type = "number")]
    pub amount: Money,
}

/// Method-shaped account details, in wire field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(untagged)]
pub enum PaymentDetailsWire {
    MobileMoney {
        mobile_network: String,
        mobile_number: String,
        account_name: String,
    },
    BankTransfer {
        bank_name: String,
        account_name: String,
        account_number: String,
        swift_code: Option<String>,
    },
}

/// Body of `POST /organizers/payouts/request`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PayoutRequest {
    pub events: Vec<PayoutLine>,
    pub awards: Vec<PayoutLine>,
    pub payment_method: PaymentMethod,
    pub payment_details: PaymentDetailsWire,
}

impl PayoutRequest {
    /// Number of line items referenced by the request.
    pub fn item_count(&self) -> usize {
        self.events.len() + self.awards.len()
    }
}

/// An item the collaborator accepted for payout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct AcceptedPayout {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub payout_id: Option<PayoutId>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub amount: Option<Money>,
}

/// A per-item rejection reported by the collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PayoutItemError {
    #[serde(default)]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

/// Response of `POST /organizers/payouts/request`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PayoutResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub events: Vec<AcceptedPayout>,
    #[serde(default)]
    pub awards: Vec<AcceptedPayout>,
    #[serde(default)]
    pub errors: Vec<PayoutItemError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PayoutResponse {
    /// Accepted events plus accepted awards.
    pub fn accepted_count(&self) -> usize {
        self.events.len() + self.awards.len()
    }

    /// First non-empty reason reported, falling back to the top-level message.
    pub fn first_error(&self) -> Option<&str> {
        self.errors
            .iter()
            .map(|e| e.error.as_str())
            .find(|e| !e.is_empty())
            .or(self.message.as_deref().filter(|m| !m.is_empty()))
    }
}

/// Lifecycle state of a payout on the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Other,
}

impl FromStr for PayoutStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseEnumError::new("payout status", other)),
        }
    }
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        }
    }
}

/// A payout as listed in the history endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PayoutRecord {
    pub id: PayoutId,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    #[ts(type = "number")]
    pub amount: Money,
    pub status: PayoutStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub source_id: Option<ItemId>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Filters for `GET /organizers/payouts`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PayoutStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub last_page: u32,
}

/// One page of payout history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct PayoutPage {
    #[serde(default)]
    pub payouts: Vec<PayoutRecord>,
    #[serde(default)]
    pub pagination: Pagination,
}
