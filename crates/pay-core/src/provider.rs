//! # Provider URL Table
//!
//! One redirect URL template per [`PaymentMethod`]. The table is a struct
//! with a field per variant and lookups go through an exhaustive `match`,
//! so a new payment method does not compile until it has a template.
//!
//! Templates may be overridden from TOML (see `config/providers.toml`):
//!
//! ```toml
//! sbp = "https://sbp.payment.ru/pay?order={order}&amount={amount}"
//! tbank = "https://securepay.tinkoff.ru/pay?order={order}&amount={amount}"
//! sber = "https://securepayments.sberbank.ru/payment?order={order}&amount={amount}"
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::method::PaymentMethod;
use crate::order::OrderId;
use serde::Deserialize;

pub const ORDER_PLACEHOLDER: &str = "{order}";
pub const AMOUNT_PLACEHOLDER: &str = "{amount}";

pub const SBP_TEMPLATE: &str = "https://sbp.payment.ru/pay?order={order}&amount={amount}";
pub const TBANK_TEMPLATE: &str = "https://securepay.tinkoff.ru/pay?order={order}&amount={amount}";
pub const SBER_TEMPLATE: &str =
    "https://securepayments.sberbank.ru/payment?order={order}&amount={amount}";

/// A redirect URL pattern with `{order}` and `{amount}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct ProviderTemplate(String);

impl ProviderTemplate {
    /// Create a template, rejecting patterns that lack a placeholder
    pub fn new(pattern: impl Into<String>) -> PaymentResult<Self> {
        let pattern = pattern.into();
        for placeholder in [ORDER_PLACEHOLDER, AMOUNT_PLACEHOLDER] {
            if !pattern.contains(placeholder) {
                return Err(PaymentError::Configuration(format!(
                    "provider template '{}' is missing {}",
                    pattern, placeholder
                )));
            }
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute the order id and amount
    pub fn render(&self, order_id: &OrderId, amount: f64) -> String {
        self.0
            .replace(ORDER_PLACEHOLDER, order_id.as_str())
            .replace(AMOUNT_PLACEHOLDER, &format_amount(amount))
    }
}

impl TryFrom<String> for ProviderTemplate {
    type Error = PaymentError;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

/// Natural decimal form: `100` for 100.0, `99.5` for 99.5
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// Redirect templates keyed by payment method
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderTable {
    pub sbp: ProviderTemplate,
    pub tbank: ProviderTemplate,
    pub sber: ProviderTemplate,
}

impl ProviderTable {
    /// Template for a method; total over every variant
    pub fn template(&self, method: PaymentMethod) -> &ProviderTemplate {
        match method {
            PaymentMethod::Sbp => &self.sbp,
            PaymentMethod::Tbank => &self.tbank,
            PaymentMethod::Sber => &self.sber,
        }
    }

    /// Render the redirect URL for a method
    pub fn payment_url(&self, method: PaymentMethod, order_id: &OrderId, amount: f64) -> String {
        self.template(method).render(order_id, amount)
    }

    /// Load overrides from TOML; missing keys keep their built-in template
    pub fn from_toml_str(content: &str) -> PaymentResult<Self> {
        toml::from_str(content)
            .map_err(|e| PaymentError::Configuration(format!("invalid provider table: {}", e)))
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self {
            sbp: ProviderTemplate(SBP_TEMPLATE.to_string()),
            tbank: ProviderTemplate(TBANK_TEMPLATE.to_string()),
            sber: ProviderTemplate(SBER_TEMPLATE.to_string()),
        }
    }
}
