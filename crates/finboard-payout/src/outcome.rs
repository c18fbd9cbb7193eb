//! Typed outcome of a payout submission.

use std::fmt;

use finboard_types::payout::PayoutResponse;
use serde::{Deserialize, Serialize};

/// Shown when the collaborator gives no reason for a rejection.
pub const GENERIC_FAILURE: &str = "Failed to submit payout request. Please try again.";

/// How a submission ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The collaborator reported overall success.
    Succeeded { accepted: usize },
    /// Some items were accepted and some rejected.
    PartiallyFailed {
        accepted: usize,
        failed: usize,
        errors: Vec<String>,
    },
    /// Nothing was accepted, or the request never reached the collaborator.
    Failed { message: String },
}

impl SubmissionOutcome {
    /// Classify a collaborator response to a request referencing `requested` items.
    pub fn from_response(response: &PayoutResponse, requested: usize) -> Self {
        let accepted = response.accepted_count();

        if response.success {
            return Self::Succeeded { accepted };
        }

        if accepted > 0 {
            let errors: Vec<String> = response
                .errors
                .iter()
                .map(|e| e.error.clone())
                .filter(|e| !e.is_empty())
                .collect();
            let failed = if response.errors.is_empty() {
                requested.saturating_sub(accepted)
            } else {
                response.errors.len()
            };
            return Self::PartiallyFailed {
                accepted,
                failed,
                errors,
            };
        }

        Self::Failed {
            message: response.first_error().unwrap_or(GENERIC_FAILURE).to_string(),
        }
    }

    /// A request that failed in transport.
    pub fn from_transport_error(err: &dyn fmt::Display) -> Self {
        let message = err.to_string();
        Self::Failed {
            message: if message.trim().is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                message
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Notice shown to the organizer.
    pub fn message(&self) -> String {
        match self {
            Self::Succeeded { accepted } => {
                format!("{accepted} payout request(s) submitted successfully")
            }
            Self::PartiallyFailed {
                accepted, failed, ..
            } => format!("{accepted} payout(s) requested, but {failed} failed"),
            Self::Failed { message } => message.clone(),
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
