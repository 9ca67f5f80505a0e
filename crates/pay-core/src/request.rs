//! # Payment Request Types
//!
//! The validated shape of a checkout submission. Values of these types are
//! produced by [`crate::validate`]; a `PaymentRequest` only exists when every
//! field constraint held.

use crate::method::PaymentMethod;
use serde::Serialize;

/// One line item from the cart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    /// Catalog id
    pub id: i64,

    /// Display name (non-empty)
    pub name: String,

    /// Unit price (> 0)
    pub price: f64,

    /// Quantity (> 0)
    pub quantity: u64,

    /// Image reference, not validated
    pub image: String,
}

/// Delivery and contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,

    /// Optional, empty when not supplied
    pub postal_code: String,
}

impl CustomerInfo {
    /// Contact view echoed back to the caller; address fields are left out
    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Condensed customer view used in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A fully validated payment request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount to charge (> 0)
    pub amount: f64,

    /// Provider to redirect to
    pub payment_method: PaymentMethod,

    /// Contact and delivery details
    pub customer_info: CustomerInfo,

    /// Cart contents (at least one)
    pub items: Vec<CartItem>,
}

impl PaymentRequest {
    /// Number of line items (not units)
    pub fn items_count(&self) -> usize {
        self.items.len()
    }
}
