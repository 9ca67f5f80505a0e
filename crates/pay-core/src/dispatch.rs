//! # Payment Dispatch
//!
//! Maps a validated request and its order id to the payment initiation
//! payload returned to the caller. No gateway is contacted; the redirect URL
//! is rendered from the [`ProviderTable`].

use crate::method::PaymentMethod;
use crate::order::OrderId;
use crate::provider::ProviderTable;
use crate::request::{CustomerSummary, PaymentRequest};
use serde::Serialize;

/// Status reported for a freshly initiated payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitiationStatus {
    /// Awaiting the customer on the provider page
    Pending,
}

/// Response payload for an accepted request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiation {
    pub success: bool,
    pub order_id: OrderId,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_url: String,
    pub customer: CustomerSummary,
    pub items_count: usize,
    pub status: InitiationStatus,
}

/// Renders payment initiations from a provider table
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    providers: ProviderTable,
}

impl Dispatcher {
    pub fn new(providers: ProviderTable) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &ProviderTable {
        &self.providers
    }

    /// Build the initiation payload; total over every payment method
    pub fn dispatch(&self, request: &PaymentRequest, order_id: &OrderId) -> PaymentInitiation {
        PaymentInitiation {
            success: true,
            order_id: order_id.clone(),
            amount: request.amount,
            payment_method: request.payment_method,
            payment_url: self.providers.payment_url(
                request.payment_method,
                order_id,
                request.amount,
            ),
            customer: request.customer_info.summary(),
            items_count: request.items_count(),
            status: InitiationStatus::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::RequestContext;
    use crate::request::{CartItem, CustomerInfo};

    fn request(method: PaymentMethod, items: usize) -> PaymentRequest {
        PaymentRequest {
            amount: 249.9,
            payment_method: method,
            customer_info: CustomerInfo {
                full_name: "Ivan Sidorov".into(),
                email: "ivan@example.com".into(),
                phone: "+79001234567".into(),
                address: "Tverskaya 7".into(),
                city: "Moscow".into(),
                postal_code: "125009".into(),
            },
            items: (0..items)
                .map(|i| CartItem {
                    id: i as i64,
                    name: format!("Box {}", i),
                    price: 10.0,
                    quantity: 1,
                    image: String::new(),
                })
                .collect(),
        }
    }

    fn order_id() -> OrderId {
        OrderId::from_context(&RequestContext::new("0a1b2c3d4e5f").unwrap())
    }

    #[test]
    fn test_dispatch_payload_shape() {
        let dispatcher = Dispatcher::default();
        let initiation = dispatcher.dispatch(&request(PaymentMethod::Tbank, 3), &order_id());
        let json = serde_json::to_value(&initiation).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["orderId"], "ORDER-0A1B2C3D");
        assert_eq!(json["amount"], 249.9);
        assert_eq!(json["paymentMethod"], "tbank");
        assert_eq!(
            json["paymentUrl"],
            "https://securepay.tinkoff.ru/pay?order=ORDER-0A1B2C3D&amount=249.9"
        );
        assert_eq!(json["customer"]["name"], "Ivan Sidorov");
        assert!(json["customer"].get("address").is_none());
        assert_eq!(json["itemsCount"], 3);
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_dispatch_is_total_and_distinct() {
        let dispatcher = Dispatcher::default();
        let urls: Vec<String> = PaymentMethod::ALL
            .iter()
            .map(|m| dispatcher.dispatch(&request(*m, 1), &order_id()).payment_url)
            .collect();

        assert_eq!(urls.len(), 3);
        assert_ne!(urls[0], urls[1]);
        assert_ne!(urls[1], urls[2]);
        assert_ne!(urls[0], urls[2]);
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let dispatcher = Dispatcher::default();
        let req = request(PaymentMethod::Sber, 2);

        let first = serde_json::to_vec(&dispatcher.dispatch(&req, &order_id())).unwrap();
        let second = serde_json::to_vec(&dispatcher.dispatch(&req, &order_id())).unwrap();
        assert_eq!(first, second);
    }
}
