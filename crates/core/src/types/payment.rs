//! Payment methods accepted at checkout.

use serde::{Deserialize, Serialize};

/// Payment method selected during checkout.
///
/// The serialized strings are the backend wire contract and double as the
/// display labels, so `Display` and serde must stay in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Net Banking")]
    NetBanking,
    #[serde(rename = "Credit/Debit Card")]
    CreditDebitCard,
}

impl PaymentMethod {
    /// All methods offered at checkout, in display order.
    pub const ALL: [Self; 4] = [
        Self::CashOnDelivery,
        Self::Upi,
        Self::NetBanking,
        Self::CreditDebitCard,
    ];

    /// The wire/display label for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::Upi => "UPI",
            Self::NetBanking => "Net Banking",
            Self::CreditDebitCard => "Credit/Debit Card",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// Error returned when parsing an unrecognized payment method label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);
