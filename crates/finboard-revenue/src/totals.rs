//! Net revenue summation over the selected items.

use finboard_types::revenue::RevenueLineItem;
use finboard_types::Money;
use serde::{Deserialize, Serialize};

/// Net revenue backing the current selection, split by source.
///
/// Derived on demand from the selection and the latest fetched lists;
/// never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTotal {
    /// Sum over selected events.
    pub events: Money,
    /// Sum over selected awards.
    pub awards: Money,
    /// `events + awards`.
    pub total: Money,
}

/// Sum the net revenue of the selected events and awards.
///
/// Items with no reported revenue count as zero. Empty inputs yield an
/// all-zero total. Sums saturate at the representable bound instead of
/// overflowing.
pub fn calculate_selected_total<'a, E, A>(selected_events: E, selected_awards: A) -> SelectedTotal
where
    E: IntoIterator<Item = &'a RevenueLineItem>,
    A: IntoIterator<Item = &'a RevenueLineItem>,
{
    let events = sum_net(selected_events);
    let awards = sum_net(selected_awards);
    SelectedTotal {
        events,
        awards,
        total: saturating_add(events, awards),
    }
}

fn saturating_add(a: Money, b: Money) -> Money {
    a.checked_add(b).unwrap_or(if b.is_sign_negative() {
        Money::MIN
    } else {
        Money::MAX
    })
}

fn sum_net<'a>(items: impl IntoIterator<Item = &'a RevenueLineItem>) -> Money {
    items
        .into_iter()
        .map(RevenueLineItem::net_revenue_or_zero)
        .fold(Money::ZERO, saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, net: Option<Money>) -> RevenueLineItem {
        RevenueLineItem {
            id,
            title: format!("item {id}"),
            date: None,
            net_revenue: net,
            is_eligible_for_payout: true,
            gross_revenue: None,
            platform_fee: None,
            payout_status: None,
            tickets_sold: None,
            votes_count: None,
        }
    }

    #[test]
    fn test_empty_is_zero() {
        let none: Vec<RevenueLineItem> = Vec::new();
        let total = calculate_selected_total(&none, &none);
        assert_eq!(total, SelectedTotal::default());
        assert_eq!(total.total, Money::ZERO);
    }

    #[test]
    fn test_sums_each_source() {
        let events = vec![
            item(1, Some(Money::new(10050, 2))),
            item(2, Some(Money::new(2025, 2))),
        ];
        let awards = vec![item(9, Some(Money::from(40)))];

        let total = calculate_selected_total(&events, &awards);
        assert_eq!(total.events, Money::new(12075, 2));
        assert_eq!(total.awards, Money::from(40));
        assert_eq!(total.total, Money::new(16075, 2));
    }

    #[test]
    fn test_missing_revenue_counts_as_zero() {
        let events = vec![item(1, None), item(2, Some(Money::from(5)))];
        let total = calculate_selected_total(&events, &Vec::<RevenueLineItem>::new());
        assert_eq!(total.events, Money::from(5));
        assert_eq!(total.awards, Money::ZERO);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let samples: [(&[i64], &[i64]); 4] = [
            (&[], &[]),
            (&[0, 0], &[1]),
            (&[1999, 1, 250_000], &[]),
            (&[3, 7, 11], &[13, 17, 19, 23]),
        ];
        for (event_cents, award_cents) in samples {
            let events: Vec<_> = event_cents
                .iter()
                .enumerate()
                .map(|(i, c)| item(i as u64, Some(Money::new(*c, 2))))
                .collect();
            let awards: Vec<_> = award_cents
                .iter()
                .enumerate()
                .map(|(i, c)| item(i as u64, Some(Money::new(*c, 2))))
                .collect();

            let total = calculate_selected_total(&events, &awards);
            assert_eq!(total.total, total.events + total.awards);
        }
    }

    #[test]
    fn test_overflow_saturates() {
        let events = vec![
            item(1, Some(Money::MAX)),
            item(2, Some(Money::ONE)),
        ];
        let awards = vec![item(3, Some(Money::ONE))];

        let total = calculate_selected_total(&events, &awards);
        assert_eq!(total.events, Money::MAX);
        assert_eq!(total.awards, Money::ONE);
        assert_eq!(total.total, Money::MAX);
    }
}
