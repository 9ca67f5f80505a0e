//! # pay-core
//!
//! Request validation and payment-method dispatch for boxpaper-pay.
//!
//! This crate provides:
//! - `PaymentRequest` and friends, the validated checkout shape
//! - `validate_request`, which accepts or rejects a raw body as a whole
//! - `ProviderTable` and `Dispatcher`, which turn a request into a redirect
//! - `PaymentHandler`, the single entry point a transport calls
//! - `PaymentError` for typed error handling
//!
//! Everything here is pure and synchronous: one call in, one result out.
//!
//! ## Example
//!
//! ```rust
//! use pay_core::{PaymentHandler, RequestContext, Status};
//!
//! let handler = PaymentHandler::default();
//! let ctx = RequestContext::new("abcdefgh-1234").unwrap();
//! let body = br#"{"amount":100,"paymentMethod":"sbp",
//!     "customerInfo":{"fullName":"A","email":"a@a.com","phone":"1","address":"x","city":"y"},
//!     "items":[{"id":1,"name":"Widget","price":50,"quantity":2,"image":"img.png"}]}"#;
//!
//! let outcome = handler.handle("POST", body, &ctx);
//! assert_eq!(outcome.status(), Status::Ok);
//! assert!(outcome.body().unwrap().contains("ORDER-ABCDEFGH"));
//! ```

pub mod dispatch;
pub mod error;
pub mod function;
pub mod handler;
pub mod method;
pub mod order;
pub mod provider;
pub mod request;
pub mod validate;

// Re-exports for convenience
pub use dispatch::{Dispatcher, InitiationStatus, PaymentInitiation};
pub use error::{Constraint, PaymentError, PaymentResult, Violation, Violations};
pub use function::FunctionResponse;
pub use handler::{ErrorResponse, MethodClass, Outcome, PaymentHandler, Status};
pub use method::{PaymentMethod, UnknownPaymentMethod};
pub use order::{OrderId, RequestContext};
pub use provider::{ProviderTable, ProviderTemplate};
pub use request::{CartItem, CustomerInfo, CustomerSummary, PaymentRequest};
pub use validate::{validate_request, validate_value};
