//! # Payment Methods
//!
//! The closed set of payment providers a checkout can be routed to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Fast payment system (SBP) redirect
    Sbp,
    /// T-Bank secure payment page
    Tbank,
    /// Sber secure payment page
    Sber,
}

impl PaymentMethod {
    /// Every variant, in table order
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Sbp, PaymentMethod::Tbank, PaymentMethod::Sber];

    /// Returns the wire code for this method
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Sbp => "sbp",
            PaymentMethod::Tbank => "tbank",
            PaymentMethod::Sber => "sber",
        }
    }

    /// Wire codes of every variant
    pub fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.as_str()).collect()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known method codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPaymentMethod(pub String);

impl fmt::Display for UnknownPaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown payment method '{}' (expected one of: {})",
            self.0,
            PaymentMethod::codes().join(", ")
        )
    }
}

impl std::error::Error for UnknownPaymentMethod {}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}
