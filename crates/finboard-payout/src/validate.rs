//! Validation gate run before every submission.
//!
//! Checks run in a fixed order and the first failure is returned alone:
//!
//! 1. something is selected
//! 2. the amount is a positive decimal
//! 3. the amount does not exceed the selected total
//! 4. the payment details are complete for their method

use std::str::FromStr;

use finboard_revenue::format::format_currency;
use finboard_revenue::selection::Selection;
use finboard_revenue::totals::SelectedTotal;
use finboard_types::{Money, MIN_MOBILE_NUMBER_DIGITS};

use crate::details::{is_known_bank, is_known_network, PaymentDetails};

/// A single user-facing reason the draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select at least one event or award")]
    EmptySelection,

    #[error("Please enter a valid amount greater than zero")]
    InvalidAmount,

    #[error("Amount exceeds available balance of {}", balance(.available, .currency))]
    ExceedsAvailable {
        /// The parsed amount entered.
        requested: Money,
        /// Net revenue backing the selection.
        available: Money,
        /// Currency the limit is displayed in.
        currency: String,
    },

    #[error("Please select a mobile network")]
    MissingNetwork,

    #[error("Please enter the account holder name")]
    MissingAccountHolder,

    #[error("Please enter a valid mobile number (at least 10 digits)")]
    InvalidMobileNumber,

    #[error("Please select a bank")]
    MissingBank,

    #[error("Please enter the account number")]
    MissingAccountNumber,
}

fn balance(available: &Money, currency: &str) -> String {
    format_currency(*available, currency)
}

/// Parse a manually entered amount.
///
/// Accepts plain decimals only; the result is strictly positive.
pub fn parse_amount(input: &str) -> Result<Money, ValidationError> {
    let amount = Money::from_str(input.trim()).map_err(|_| ValidationError::InvalidAmount)?;
    if amount <= Money::ZERO {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(amount)
}

/// Check method-specific completeness of the account details.
pub fn validate_details(details: &PaymentDetails) -> Result<(), ValidationError> {
    match details {
        PaymentDetails::MobileMoney {
            network,
            account_holder_name,
            mobile_number,
        } => {
            if !is_known_network(network.trim()) {
                return Err(ValidationError::MissingNetwork);
            }
            if account_holder_name.trim().is_empty() {
                return Err(ValidationError::MissingAccountHolder);
            }
            let digits = mobile_number.chars().filter(char::is_ascii_digit).count();
            if digits < MIN_MOBILE_NUMBER_DIGITS {
                return Err(ValidationError::InvalidMobileNumber);
            }
        }
        PaymentDetails::BankTransfer {
            bank_name,
            account_holder_name,
            account_number,
            ..
        } => {
            if !is_known_bank(bank_name.trim()) {
                return Err(ValidationError::MissingBank);
            }
            if account_holder_name.trim().is_empty() {
                return Err(ValidationError::MissingAccountHolder);
            }
            if account_number.trim().is_empty() {
                return Err(ValidationError::MissingAccountNumber);
            }
        }
    }
    Ok(())
}

/// Run the full gate. Returns the parsed amount on success.
pub fn validate_request(
    selection: &Selection,
    amount: &str,
    total: &SelectedTotal,
    details: &PaymentDetails,
    currency: &str,
) -> Result<Money, ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection);
    }

    let requested = parse_amount(amount)?;
    if requested > total.total {
        return Err(ValidationError::ExceedsAvailable {
            requested,
            available: total.total,
            currency: currency.to_string(),
        });
    }

    validate_details(details)?;
    Ok(requested)
}
