//! # finboard-types
//!
//! Shared domain and wire types used across the finboard workspace.
//! Field names match the organizer finance REST API exactly; amounts are
//! carried as [`Money`] so that summation and formatting stay exact.

pub mod api;
pub mod overview;
pub mod payout;
pub mod revenue;

/// Decimal amount in major currency units (e.g. cedis, not pesewas).
pub type Money = rust_decimal::Decimal;

/// Server-side identifier of an event or award.
pub type ItemId = u64;

/// Server-side identifier of a payout record.
pub type PayoutId = u64;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "GHS";

/// Days an item must be past completion before the server marks it eligible.
pub const PAYOUT_HOLD_DAYS: u32 = 7;

/// Minimum digit count of a mobile money number.
pub const MIN_MOBILE_NUMBER_DIGITS: usize = 10;

/// Page size used for payout history when the caller gives none.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Error parsing one of the string-keyed enums in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        assert_eq!(super::DEFAULT_CURRENCY, "GHS");
        assert_eq!(super::PAYOUT_HOLD_DAYS, 7);
        assert_eq!(super::MIN_MOBILE_NUMBER_DIGITS, 10);
    }

    #[test]
    #[ignore] // Run manually to generate bindings
    fn export_ts_bindings() {
        use ts_rs::TS;
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../bindings");
        std::fs::create_dir_all(&dir).expect("create bindings dir");
        crate::revenue::RevenueLineItem::export_all_to(&dir).expect("export");
        crate::revenue::SourceFilter::export_all_to(&dir).expect("export");
        crate::overview::FinanceOverview::export_all_to(&dir).expect("export");
        crate::payout::PayoutRecord::export_all_to(&dir).expect("export");
        crate::payout::PayoutRequest::export_all_to(&dir).expect("export");
        crate::payout::PayoutResponse::export_all_to(&dir).expect("export");
    }
}
