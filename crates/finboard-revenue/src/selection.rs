//! Payout-item selection.
//!
//! The selectable pool is the server's eligible items narrowed by a
//! [`SourceFilter`]. The filter only affects what is offered: ids already
//! selected under another filter stay selected, and the union of both kinds
//! is what gets submitted.

use finboard_types::revenue::{ItemKind, RevenueLineItem, SourceFilter};
use finboard_types::ItemId;
use serde::{Deserialize, Serialize};

use crate::totals::{calculate_selected_total, SelectedTotal};
use crate::{Result, RevenueError};

/// Items that may currently be offered for selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EligibleItems<'a> {
    pub events: Vec<&'a RevenueLineItem>,
    pub awards: Vec<&'a RevenueLineItem>,
}

impl EligibleItems<'_> {
    /// Whether `id` of `kind` is in the projection.
    pub fn contains(&self, kind: ItemKind, id: ItemId) -> bool {
        let items = match kind {
            ItemKind::Event => &self.events,
            ItemKind::Award => &self.awards,
        };
        items.iter().any(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.awards.is_empty()
    }
}

/// Project the fetched lists down to what may be selected under `filter`.
///
/// Never yields an item whose `is_eligible_for_payout` is false.
pub fn eligible_items<'a>(
    events: &'a [RevenueLineItem],
    awards: &'a [RevenueLineItem],
    filter: SourceFilter,
) -> EligibleItems<'a> {
    let pick = |items: &'a [RevenueLineItem], kind: ItemKind| -> Vec<&'a RevenueLineItem> {
        if !filter.shows(kind) {
            return Vec::new();
        }
        items
            .iter()
            .filter(|item| item.is_eligible_for_payout)
            .collect()
    };

    EligibleItems {
        events: pick(events, ItemKind::Event),
        awards: pick(awards, ItemKind::Award),
    }
}

/// Ids checked for inclusion in a payout request, one list per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub events: Vec<ItemId>,
    pub awards: Vec<ItemId>,
}

impl Selection {
    pub fn ids(&self, kind: ItemKind) -> &[ItemId] {
        match kind {
            ItemKind::Event => &self.events,
            ItemKind::Award => &self.awards,
        }
    }

    fn ids_mut(&mut self, kind: ItemKind) -> &mut Vec<ItemId> {
        match kind {
            ItemKind::Event => &mut self.events,
            ItemKind::Award => &mut self.awards,
        }
    }

    pub fn is_selected(&self, kind: ItemKind, id: ItemId) -> bool {
        self.ids(kind).contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.awards.is_empty()
    }

    /// Total number of selected ids across both kinds.
    pub fn len(&self) -> usize {
        self.events.len() + self.awards.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.awards.clear();
    }

    /// Drop ids of `kind` that `items` no longer offers as eligible.
    ///
    /// Returns how many ids were dropped.
    pub fn retain_eligible(&mut self, kind: ItemKind, items: &[RevenueLineItem]) -> usize {
        let ids = self.ids_mut(kind);
        let before = ids.len();
        ids.retain(|id| {
            items
                .iter()
                .any(|item| item.id == *id && item.is_eligible_for_payout)
        });
        before - ids.len()
    }

    /// Remove `id` if present, otherwise append it.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, kind: ItemKind, id: ItemId) -> bool {
        let ids = self.ids_mut(kind);
        if let Some(pos) = ids.iter().position(|selected| *selected == id) {
            ids.remove(pos);
            false
        } else {
            ids.push(id);
            true
        }
    }

    /// Toggle `id`, refusing ids that are not in the eligible projection.
    ///
    /// # Errors
    ///
    /// - [`RevenueError::NotSelectable`] if the item is not currently offered
    pub fn toggle_eligible(
        &mut self,
        eligible: &EligibleItems<'_>,
        kind: ItemKind,
        id: ItemId,
    ) -> Result<bool> {
        if !eligible.contains(kind, id) {
            return Err(RevenueError::NotSelectable { kind, id });
        }
        let selected = self.toggle(kind, id);
        tracing::debug!(%kind, id, selected, "payout item toggled");
        Ok(selected)
    }

    /// Look up the selected line items in the fetched lists.
    ///
    /// Ids that no longer appear in the lists are skipped.
    pub fn resolve<'a>(
        &self,
        events: &'a [RevenueLineItem],
        awards: &'a [RevenueLineItem],
    ) -> (Vec<&'a RevenueLineItem>, Vec<&'a RevenueLineItem>) {
        let lookup = |ids: &[ItemId], items: &'a [RevenueLineItem]| {
            ids.iter()
                .filter_map(|id| items.iter().find(|item| item.id == *id))
                .collect::<Vec<_>>()
        };
        (lookup(&self.events, events), lookup(&self.awards, awards))
    }

    /// Net revenue backing this selection.
    pub fn total(&self, events: &[RevenueLineItem], awards: &[RevenueLineItem]) -> SelectedTotal {
        let (selected_events, selected_awards) = self.resolve(events, awards);
        calculate_selected_total(selected_events, selected_awards)
    }
}

/// Functional form of [`Selection::toggle`].
pub fn toggle_selection(selection: &Selection, kind: ItemKind, id: ItemId) -> Selection {
    let mut next = selection.clone();
    next.toggle(kind, id);
    next
}
