//! # finboard-revenue
//!
//! Revenue aggregation and payout-item selection.
//!
//! Everything here is pure and synchronous: the server decides which items
//! are eligible, this crate only narrows, selects and sums them.
//!
//! ## Modules
//!
//! - [`totals`] — Net revenue summation over a selection
//! - [`format`] — Locale-stable currency rendering
//! - [`selection`] — Eligible-item projection, source filter and selection toggles

pub mod format;
pub mod selection;
pub mod totals;

use finboard_types::revenue::ItemKind;
use finboard_types::ItemId;

/// Error types for revenue operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevenueError {
    /// The item is not in the current eligible list.
    #[error("{kind} {id} is not eligible for payout")]
    NotSelectable {
        /// Event or award.
        kind: ItemKind,
        /// The requested id.
        id: ItemId,
    },
}

/// Convenience result type for revenue operations.
pub type Result<T> = std::result::Result<T, RevenueError>;
