//! Currency rendering for dashboard figures.
//!
//! Output is locale independent: two decimals, `,` thousands separators,
//! and a glyph prefix (`GH₵` for cedis, `$` for everything else).

use finboard_types::{Money, DEFAULT_CURRENCY};
use rust_decimal::RoundingStrategy;

/// Glyph for Ghanaian cedis.
pub const CEDI_GLYPH: &str = "GH₵";

/// Glyph used for every other currency code.
pub const DOLLAR_GLYPH: &str = "$";

/// Prefix glyph for a currency code.
pub fn currency_glyph(currency_code: &str) -> &'static str {
    if currency_code.eq_ignore_ascii_case("GHS") {
        CEDI_GLYPH
    } else {
        DOLLAR_GLYPH
    }
}

/// Render `amount` as e.g. `GH₵1,234.50`.
///
/// Rounds half-to-even to two decimals.
///
/// # Panics
///
/// Panics on a negative amount. Revenue figures are non-negative upstream,
/// so a negative value here is a bug in the caller.
pub fn format_currency(amount: Money, currency_code: &str) -> String {
    assert!(
        !amount.is_sign_negative() || amount.is_zero(),
        "cannot format negative amount {amount}"
    );

    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded.set_sign_positive(true);

    let digits = rounded.to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!(
        "{}{}.{}",
        currency_glyph(currency_code),
        group_thousands(whole),
        fraction
    )
}

/// [`format_currency`] in the default currency.
pub fn format_amount(amount: Money) -> String {
    format_currency(amount, DEFAULT_CURRENCY)
}

fn group_thousands(whole: &str) -> String {
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
