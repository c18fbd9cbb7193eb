//! Account details for the two payment methods.

use finboard_types::payout::{PaymentDetailsWire, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Mobile money carriers accepted for payouts.
pub const MOBILE_NETWORKS: &[&str] = &["MTN Mobile Money", "Telecel Cash", "AirtelTigo Money"];

/// Banks accepted for bank transfer payouts.
pub const BANKS: &[&str] = &[
    "Absa Bank Ghana",
    "Access Bank Ghana",
    "Agricultural Development Bank",
    "CalBank",
    "Ecobank Ghana",
    "Fidelity Bank Ghana",
    "First National Bank Ghana",
    "GCB Bank",
    "Prudential Bank",
    "Republic Bank Ghana",
    "Societe Generale Ghana",
    "Stanbic Bank Ghana",
    "Standard Chartered Bank Ghana",
    "United Bank for Africa Ghana",
    "Zenith Bank Ghana",
];

pub fn is_known_network(network: &str) -> bool {
    MOBILE_NETWORKS.contains(&network)
}

pub fn is_known_bank(bank: &str) -> bool {
    BANKS.contains(&bank)
}

/// Method-specific account details as entered in the form.
///
/// Fields hold raw user input; [`crate::validate`] decides completeness.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_method", rename_all = "snake_case")]
pub enum PaymentDetails {
    MobileMoney {
        #[serde(default)]
        network: String,
        #[serde(default)]
        account_holder_name: String,
        #[serde(default)]
        mobile_number: String,
    },
    BankTransfer {
        #[serde(default)]
        bank_name: String,
        #[serde(default)]
        account_holder_name: String,
        #[serde(default)]
        account_number: String,
        #[serde(default)]
        swift_code: Option<String>,
    },
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self::empty(PaymentMethod::MobileMoney)
    }
}

impl PaymentDetails {
    /// Blank details for `method`.
    pub fn empty(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::MobileMoney => Self::MobileMoney {
                network: String::new(),
                account_holder_name: String::new(),
                mobile_number: String::new(),
            },
            PaymentMethod::BankTransfer => Self::BankTransfer {
                bank_name: String::new(),
                account_holder_name: String::new(),
                account_number: String::new(),
                swift_code: None,
            },
        }
    }

    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::MobileMoney { .. } => PaymentMethod::MobileMoney,
            Self::BankTransfer { .. } => PaymentMethod::BankTransfer,
        }
    }

    pub fn account_holder_name(&self) -> &str {
        match self {
            Self::MobileMoney {
                account_holder_name,
                ..
            }
            | Self::BankTransfer {
                account_holder_name,
                ..
            } => account_holder_name,
        }
    }

    /// Switch to `method`, carrying over the account holder name.
    pub fn switch_method(&mut self, method: PaymentMethod) {
        if self.method() == method {
            return;
        }
        let holder = self.account_holder_name().to_string();
        *self = Self::empty(method);
        match self {
            Self::MobileMoney {
                account_holder_name,
                ..
            }
            | Self::BankTransfer {
                account_holder_name,
                ..
            } => *account_holder_name = holder,
        }
    }

    /// Wire representation with trimmed values; an empty SWIFT code is sent as null.
    pub fn to_wire(&self) -> PaymentDetailsWire {
        match self {
            Self::MobileMoney {
                network,
                account_holder_name,
                mobile_number,
            } => PaymentDetailsWire::MobileMoney {
                mobile_network: network.trim().to_string(),
                mobile_number: mobile_number.trim().to_string(),
                account_name: account_holder_name.trim().to_string(),
            },
            Self::BankTransfer {
                bank_name,
                account_holder_name,
                account_number,
                swift_code,
            } => PaymentDetailsWire::BankTransfer {
                bank_name: bank_name.trim().to_string(),
                account_name: account_holder_name.trim().to_string(),
                account_number: account_number.trim().to_string(),
                swift_code: swift_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string),
            },
        }
    }
}
