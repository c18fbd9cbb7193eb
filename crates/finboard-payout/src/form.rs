//! Payout-request form and its submission lifecycle.
//!
//! A [`PayoutForm`] owns one [`PayoutDraft`] for as long as the modal is
//! open. Submission is split into [`PayoutForm::begin_submit`] and
//! [`PayoutForm::finish_submit`] so that a caller holding the form behind a
//! lock can release it while the request is in flight; while a request is
//! outstanding every further submit is refused.

use std::fmt;

use finboard_revenue::selection::{eligible_items, Selection};
use finboard_revenue::totals::SelectedTotal;
use finboard_types::payout::{PaymentMethod, PayoutLine, PayoutRequest, PayoutResponse};
use finboard_types::revenue::{ItemKind, RevenueLineItem, SourceFilter};
use finboard_types::{ItemId, Money, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::details::PaymentDetails;
use crate::outcome::SubmissionOutcome;
use crate::validate::{validate_request, ValidationError};
use crate::{Result, SubmitError};

/// Sends an assembled payout request to the collaborator.
#[allow(async_fn_in_trait)]
pub trait PayoutGateway {
    /// Transport-level failure.
    type Error: fmt::Display;

    async fn request_payout(
        &self,
        request: &PayoutRequest,
    ) -> std::result::Result<PayoutResponse, Self::Error>;
}

/// Everything the organizer has entered in the modal.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoutDraft {
    pub filter: SourceFilter,
    pub selection: Selection,
    /// Amount exactly as typed; parsed by the validation gate.
    pub amount: String,
    pub payment: PaymentDetails,
}

/// Where the form is in its submission lifecycle.
///
/// Every state except `Submitting` accepts a new submit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        items: usize,
    },
    Succeeded {
        accepted: usize,
    },
    PartiallyFailed {
        accepted: usize,
        failed: usize,
    },
    Failed {
        message: String,
    },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }
}

impl From<&SubmissionOutcome> for SubmissionState {
    fn from(outcome: &SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Succeeded { accepted } => Self::Succeeded {
                accepted: *accepted,
            },
            SubmissionOutcome::PartiallyFailed {
                accepted, failed, ..
            } => Self::PartiallyFailed {
                accepted: *accepted,
                failed: *failed,
            },
            SubmissionOutcome::Failed { message } => Self::Failed {
                message: message.clone(),
            },
        }
    }
}

/// Serializable snapshot of the form for the UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormView {
    pub open: bool,
    pub draft: PayoutDraft,
    pub state: SubmissionState,
    pub notice: Option<String>,
    pub can_submit: bool,
}

/// The payout modal's state container.
#[derive(Clone, Debug)]
pub struct PayoutForm {
    open: bool,
    draft: PayoutDraft,
    state: SubmissionState,
    notice: Option<String>,
    currency: String,
}

impl Default for PayoutForm {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

impl PayoutForm {
    /// A closed form that displays limits in `currency`.
    pub fn new(currency: &str) -> Self {
        Self {
            open: false,
            draft: PayoutDraft::default(),
            state: SubmissionState::Idle,
            notice: None,
            currency: currency.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &PayoutDraft {
        &self.draft
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Last user-facing message (validation error or submission outcome).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> FormView {
        FormView {
            open: self.open,
            draft: self.draft.clone(),
            state: self.state.clone(),
            notice: self.notice.clone(),
            can_submit: self.open && !self.state.is_submitting(),
        }
    }

    /// Open the modal with a fresh draft.
    ///
    /// Ignored while a submission is in flight.
    pub fn open(&mut self) {
        if self.state.is_submitting() {
            return;
        }
        self.reset();
        self.open = true;
    }

    /// Close the modal and discard the draft.
    pub fn close(&mut self) {
        if self.state.is_submitting() {
            return;
        }
        self.reset();
        self.open = false;
    }

    fn reset(&mut self) {
        self.draft = PayoutDraft::default();
        self.state = SubmissionState::Idle;
        self.notice = None;
    }

    fn ensure_editable(&self) -> Result<()> {
        if !self.open {
            return Err(SubmitError::Closed);
        }
        if self.state.is_submitting() {
            return Err(SubmitError::InProgress);
        }
        Ok(())
    }

    /// The `kind` list was replaced by `items`; drop selected ids it no
    /// longer offers as eligible.
    ///
    /// Ignored while a request is in flight so the submitted selection
    /// survives a partial failure. Re-check afterwards with
    /// [`Self::prune_selection`].
    pub fn source_changed(&mut self, kind: ItemKind, items: &[RevenueLineItem]) {
        if self.state.is_submitting() {
            debug!(%kind, "source data changed during submission, selection kept");
            return;
        }
        let dropped = self.draft.selection.retain_eligible(kind, items);
        if dropped > 0 {
            info!(%kind, dropped, "dropped payout selections no longer eligible");
        }
    }

    /// Re-check the whole selection against the current lists.
    pub fn prune_selection(&mut self, events: &[RevenueLineItem], awards: &[RevenueLineItem]) {
        self.source_changed(ItemKind::Event, events);
        self.source_changed(ItemKind::Award, awards);
    }

    pub fn set_filter(&mut self, filter: SourceFilter) -> Result<()> {
        self.ensure_editable()?;
        self.draft.filter = filter;
        Ok(())
    }

    /// Toggle an item that is currently offered under the draft's filter.
    pub fn toggle_item(
        &mut self,
        events: &[RevenueLineItem],
        awards: &[RevenueLineItem],
        kind: ItemKind,
        id: ItemId,
    ) -> Result<bool> {
        self.ensure_editable()?;
        let eligible = eligible_items(events, awards, self.draft.filter);
        Ok(self.draft.selection.toggle_eligible(&eligible, kind, id)?)
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.draft.amount = amount.into();
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        self.ensure_editable()?;
        self.draft.payment.switch_method(method);
        Ok(())
    }

    pub fn set_payment_details(&mut self, details: PaymentDetails) -> Result<()> {
        self.ensure_editable()?;
        self.draft.payment = details;
        Ok(())
    }

    /// Net revenue backing the current selection.
    pub fn selected_total(
        &self,
        events: &[RevenueLineItem],
        awards: &[RevenueLineItem],
    ) -> SelectedTotal {
        self.draft.selection.total(events, awards)
    }

    /// Run the validation gate against the current lists.
    pub fn validate(
        &self,
        events: &[RevenueLineItem],
        awards: &[RevenueLineItem],
    ) -> std::result::Result<Money, ValidationError> {
        let total = self.selected_total(events, awards);
        validate_request(
            &self.draft.selection,
            &self.draft.amount,
            &total,
            &self.draft.payment,
            &self.currency,
        )
    }

    /// Validate, assemble the request and enter `Submitting`.
    ///
    /// Every selected id carries the full entered amount; the amount is not
    /// split across items.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Closed`] if the modal is not open
    /// - [`SubmitError::InProgress`] if a request is already in flight
    /// - [`SubmitError::Validation`] with the first failing check
    pub fn begin_submit(
        &mut self,
        events: &[RevenueLineItem],
        awards: &[RevenueLineItem],
    ) -> Result<PayoutRequest> {
        self.ensure_editable()?;

        let amount = match self.validate(events, awards) {
            Ok(amount) => amount,
            Err(err) => {
                self.notice = Some(err.to_string());
                return Err(err.into());
            }
        };

        let lines = |ids: &[ItemId]| -> Vec<PayoutLine> {
            ids.iter().map(|id| PayoutLine { id: *id, amount }).collect()
        };
        let request = PayoutRequest {
            events: lines(&self.draft.selection.events),
            awards: lines(&self.draft.selection.awards),
            payment_method: self.draft.payment.method(),
            payment_details: self.draft.payment.to_wire(),
        };

        info!(
            events = request.events.len(),
            awards = request.awards.len(),
            %amount,
            method = %request.payment_method,
            "submitting payout request"
        );

        self.state = SubmissionState::Submitting {
            items: request.item_count(),
        };
        self.notice = None;
        Ok(request)
    }

    /// Leave `Submitting` with the collaborator's answer.
    ///
    /// On success the draft is discarded and the modal closes; otherwise the
    /// draft is kept so the organizer can adjust and retry.
    pub fn finish_submit<E: fmt::Display>(
        &mut self,
        result: std::result::Result<PayoutResponse, E>,
    ) -> SubmissionOutcome {
        let requested = match self.state {
            SubmissionState::Submitting { items } => items,
            _ => self.draft.selection.len(),
        };

        let outcome = match result {
            Ok(response) => SubmissionOutcome::from_response(&response, requested),
            Err(err) => {
                warn!(error = %err, "payout request failed in transport");
                SubmissionOutcome::from_transport_error(&err)
            }
        };

        match &outcome {
            SubmissionOutcome::Succeeded { accepted } => {
                info!(accepted, "payout request accepted");
                self.reset();
                self.open = false;
            }
            SubmissionOutcome::PartiallyFailed {
                accepted, failed, ..
            } => warn!(accepted, failed, "payout request partially failed"),
            SubmissionOutcome::Failed { message } => {
                warn!(%message, "payout request rejected")
            }
        }

        self.state = SubmissionState::from(&outcome);
        self.notice = Some(outcome.message());
        outcome
    }

    /// Submit through `gateway` and invoke `on_success` after a successful
    /// request so the host can re-fetch balances.
    pub async fn submit<G, F>(
        &mut self,
        gateway: &G,
        events: &[RevenueLineItem],
        awards: &[RevenueLineItem],
        on_success: F,
    ) -> Result<SubmissionOutcome>
    where
        G: PayoutGateway,
        F: FnOnce(),
    {
        let request = self.begin_submit(events, awards)?;
        let result = gateway.request_payout(&request).await;
        let outcome = self.finish_submit(result);
        if outcome.is_success() {
            on_success();
        }
        Ok(outcome)
    }
}
