//! Finance page state held on behalf of the UI.
//!
//! The daemon owns one [`Dashboard`]: the last fetched overview, events and
//! awards, plus the payout form. Replacing either revenue list drops the
//! selected ids it no longer offers, so no selected id outlives its item.

use std::fmt;

use finboard_payout::form::FormView;
use finboard_payout::{self as payout, PayoutForm, SubmissionOutcome};
use finboard_revenue::format::format_currency;
use finboard_revenue::selection::{eligible_items, EligibleItems};
use finboard_revenue::totals::SelectedTotal;
use finboard_types::overview::FinanceOverview;
use finboard_types::payout::{PayoutRequest, PayoutResponse};
use finboard_types::revenue::{ItemKind, RevenueLineItem};
use finboard_types::ItemId;
use serde::Serialize;

/// Fetch status of one resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

/// A fetched resource and its load status.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Resource<T> {
    pub data: T,
    pub state: LoadState,
    pub error: Option<String>,
}

impl<T> Resource<T> {
    /// True until a fetch has succeeded; false while one is running.
    pub fn needs_fetch(&self) -> bool {
        matches!(self.state, LoadState::NotLoaded | LoadState::Failed)
    }

    pub fn begin(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn succeed(&mut self, data: T) {
        self.data = data;
        self.state = LoadState::Loaded;
        self.error = None;
    }

    /// Keep the previous data; only record the failure.
    pub fn fail(&mut self, message: String) {
        self.state = LoadState::Failed;
        self.error = Some(message);
    }
}

/// Selected total with display strings.
#[derive(Clone, Debug, Serialize)]
pub struct TotalView {
    #[serde(flatten)]
    pub total: SelectedTotal,
    pub formatted_total: String,
}

/// Everything the payout modal renders.
#[derive(Clone, Debug, Serialize)]
pub struct ModalView<'a> {
    pub form: FormView,
    pub eligible: EligibleItems<'a>,
    pub selected_total: TotalView,
    pub events_state: LoadState,
    pub awards_state: LoadState,
}

/// The organizer finance page.
#[derive(Debug)]
pub struct Dashboard {
    pub overview: Resource<Option<FinanceOverview>>,
    pub events: Resource<Vec<RevenueLineItem>>,
    pub awards: Resource<Vec<RevenueLineItem>>,
    pub form: PayoutForm,
    currency: String,
}

impl Dashboard {
    pub fn new(currency: &str) -> Self {
        Self {
            overview: Resource::default(),
            events: Resource::default(),
            awards: Resource::default(),
            form: PayoutForm::new(currency),
            currency: currency.to_string(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn resource_mut(&mut self, kind: ItemKind) -> &mut Resource<Vec<RevenueLineItem>> {
        match kind {
            ItemKind::Event => &mut self.events,
            ItemKind::Award => &mut self.awards,
        }
    }

    /// Store a freshly fetched list and drop selections it no longer offers.
    pub fn replace_items(&mut self, kind: ItemKind, items: Vec<RevenueLineItem>) {
        self.resource_mut(kind).succeed(items);
        let current = match kind {
            ItemKind::Event => &self.events.data,
            ItemKind::Award => &self.awards.data,
        };
        self.form.source_changed(kind, current);
    }

    /// Open the payout modal with a fresh draft.
    ///
    /// Returns the lists that have never been fetched (or last failed) and
    /// marks them loading, so concurrent opens do not fetch twice.
    pub fn open_modal(&mut self) -> Vec<ItemKind> {
        self.form.open();
        let mut missing = Vec::new();
        for kind in [ItemKind::Event, ItemKind::Award] {
            let resource = self.resource_mut(kind);
            if resource.needs_fetch() {
                resource.begin();
                missing.push(kind);
            }
        }
        missing
    }

    /// Toggle a selectable item against the cached lists.
    pub fn toggle_item(&mut self, kind: ItemKind, id: ItemId) -> payout::Result<bool> {
        self.form
            .toggle_item(&self.events.data, &self.awards.data, kind, id)
    }

    /// Validate the draft against the cached lists and enter `Submitting`.
    pub fn begin_submit(&mut self) -> payout::Result<PayoutRequest> {
        self.form.begin_submit(&self.events.data, &self.awards.data)
    }

    /// Leave `Submitting` and, unless the request succeeded, re-check the
    /// kept selection against lists that may have been replaced meanwhile.
    pub fn finish_submit<E: fmt::Display>(
        &mut self,
        result: std::result::Result<PayoutResponse, E>,
    ) -> SubmissionOutcome {
        let outcome = self.form.finish_submit(result);
        if !outcome.is_success() {
            self.form
                .prune_selection(&self.events.data, &self.awards.data);
        }
        outcome
    }

    pub fn eligible(&self) -> EligibleItems<'_> {
        eligible_items(&self.events.data, &self.awards.data, self.form.draft().filter)
    }

    pub fn selected_total(&self) -> TotalView {
        let total = self.form.selected_total(&self.events.data, &self.awards.data);
        TotalView {
            total,
            formatted_total: format_currency(total.total, &self.currency),
        }
    }

    pub fn modal_view(&self) -> ModalView<'_> {
        ModalView {
            form: self.form.view(),
            eligible: self.eligible(),
            selected_total: self.selected_total(),
            events_state: self.events.state,
            awards_state: self.awards.state,
        }
    }
}
