//! # finboard-payout
//!
//! The payout-request form: payment details, the validation gate, and the
//! submission state machine that turns a collaborator response into a
//! typed outcome.
//!
//! ## Modules
//!
//! - [`details`] — Mobile money / bank transfer account details
//! - [`validate`] — Ordered, short-circuiting validation gate
//! - [`outcome`] — Classification of collaborator responses
//! - [`form`] — Draft state, submission lifecycle, [`form::PayoutGateway`]

pub mod details;
pub mod form;
pub mod outcome;
pub mod validate;

pub use form::{PayoutDraft, PayoutForm, PayoutGateway, SubmissionState};
pub use outcome::SubmissionOutcome;
pub use validate::ValidationError;

/// Error types for form operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// The draft failed the validation gate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An item toggle referenced something that is not selectable.
    #[error(transparent)]
    Selection(#[from] finboard_revenue::RevenueError),

    /// A submission is already in flight for this form.
    #[error("a payout request is already being submitted")]
    InProgress,

    /// The payout modal is not open.
    #[error("the payout form is not open")]
    Closed,
}

/// Convenience result type for form operations.
pub type Result<T> = std::result::Result<T, SubmitError>;
