//! # Payment Handler
//!
//! Entry point for one invocation: classifies the HTTP method, runs the
//! validator and dispatcher for POST, and returns an [`Outcome`] that a
//! transport renders without further decisions.
//!
//! ```text
//! OPTIONS ──────────────────────────────▶ Preflight        (200, empty)
//! POST ──▶ validate ──▶ dispatch ───────▶ Accepted         (200)
//!              └──────────────────────────▶ Rejected         (400)
//! other ────────────────────────────────▶ MethodNotAllowed (405)
//! ```

use crate::dispatch::{Dispatcher, PaymentInitiation};
use crate::error::{PaymentError, PaymentResult};
use crate::order::{OrderId, RequestContext};
use crate::provider::ProviderTable;
use crate::validate::validate_request;
use serde::Serialize;

/// Headers for a CORS preflight answer
pub const PREFLIGHT_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Max-Age", "86400"),
];

/// Headers for every other response, failures included
pub const JSON_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
];

/// Error marker for rejected payloads
pub const INVALID_REQUEST: &str = "Invalid request";

/// Error marker for unsupported verbs
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// How the incoming HTTP method is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    Preflight,
    Submit,
    Unsupported,
}

impl MethodClass {
    pub fn classify(method: &str) -> Self {
        match method {
            "OPTIONS" => MethodClass::Preflight,
            "POST" => MethodClass::Submit,
            _ => MethodClass::Unsupported,
        }
    }
}

/// Status classification handed to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Ok,
    BadRequest,
    MethodNotAllowed,
    PreflightOk,
}

impl Status {
    pub fn http_code(&self) -> u16 {
        match self {
            Status::Ok | Status::PreflightOk => 200,
            Status::BadRequest => 400,
            Status::MethodNotAllowed => 405,
        }
    }
}

/// Failure body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Result of one invocation
#[derive(Debug)]
pub enum Outcome {
    Preflight,
    MethodNotAllowed { method: String },
    Accepted(PaymentInitiation),
    Rejected(PaymentError),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Preflight => Status::PreflightOk,
            Outcome::MethodNotAllowed { .. } => Status::MethodNotAllowed,
            Outcome::Accepted(_) => Status::Ok,
            Outcome::Rejected(_) => Status::BadRequest,
        }
    }

    pub fn headers(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Outcome::Preflight => PREFLIGHT_HEADERS,
            _ => JSON_HEADERS,
        }
    }

    /// `Content-Type` from the header set, absent for preflight
    pub fn content_type(&self) -> Option<&'static str> {
        self.headers()
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("Content-Type"))
            .map(|&(_, value)| value)
    }

    /// Serialized body text in field declaration order; empty for preflight
    pub fn body(&self) -> PaymentResult<String> {
        let rendered = match self {
            Outcome::Preflight => String::new(),
            Outcome::MethodNotAllowed { .. } => {
                serde_json::to_string(&ErrorResponse::new(METHOD_NOT_ALLOWED))?
            }
            Outcome::Accepted(initiation) => serde_json::to_string(initiation)?,
            Outcome::Rejected(err) => serde_json::to_string(
                &ErrorResponse::new(INVALID_REQUEST).with_message(err.to_string()),
            )?,
        };
        Ok(rendered)
    }

    /// Body as a JSON value, or `None` for the empty preflight answer
    pub fn body_json(&self) -> Option<serde_json::Value> {
        match self {
            Outcome::Preflight => None,
            _ => serde_json::from_str(&self.body().ok()?).ok(),
        }
    }

    pub fn initiation(&self) -> Option<&PaymentInitiation> {
        match self {
            Outcome::Accepted(initiation) => Some(initiation),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PaymentError> {
        match self {
            Outcome::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// Validator plus dispatcher behind a single call
#[derive(Debug, Clone, Default)]
pub struct PaymentHandler {
    dispatcher: Dispatcher,
}

impl PaymentHandler {
    pub fn new(providers: ProviderTable) -> Self {
        Self {
            dispatcher: Dispatcher::new(providers),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn handle(&self, method: &str, body: &[u8], ctx: &RequestContext) -> Outcome {
        match MethodClass::classify(method) {
            MethodClass::Preflight => Outcome::Preflight,
            MethodClass::Unsupported => Outcome::MethodNotAllowed {
                method: method.to_string(),
            },
            MethodClass::Submit => match validate_request(body) {
                Ok(request) => {
                    let order_id = OrderId::from_context(ctx);
                    Outcome::Accepted(self.dispatcher.dispatch(&request, &order_id))
                }
                Err(err) => Outcome::Rejected(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Constraint;

    const SCENARIO_A: &str = r#"{"amount":100,"paymentMethod":"sbp","customerInfo":{"fullName":"A","email":"a@a.com","phone":"1","address":"x","city":"y"},"items":[{"id":1,"name":"Widget","price":50,"quantity":2,"image":"img.png"}]}"#;

    fn ctx() -> RequestContext {
        RequestContext::new("abcdefgh-1234").unwrap()
    }

    fn post(body: &str) -> Outcome {
        PaymentHandler::default().handle("POST", body.as_bytes(), &ctx())
    }

    #[test]
    fn test_scenario_a_accepted() {
        let outcome = post(SCENARIO_A);
        assert_eq!(outcome.status(), Status::Ok);
        assert_eq!(outcome.status().http_code(), 200);

        let body = outcome.body_json().unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["orderId"], "ORDER-ABCDEFGH");
        assert_eq!(body["paymentMethod"], "sbp");
        assert_eq!(body["itemsCount"], 1);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["customer"]["email"], "a@a.com");

        let url = body["paymentUrl"].as_str().unwrap();
        assert!(url.contains("sbp.payment.ru"));
        assert!(url.contains("amount=100"));
        assert!(url.contains("order=ORDER-ABCDEFGH"));
    }

    #[test]
    fn test_scenario_b_zero_amount() {
        let outcome = post(&SCENARIO_A.replace(r#""amount":100"#, r#""amount":0"#));
        assert_eq!(outcome.status(), Status::BadRequest);

        let violations = outcome.error().and_then(PaymentError::violations).unwrap();
        assert_eq!(
            violations.for_field("amount").unwrap().constraint,
            Constraint::GreaterThan { bound: 0 }
        );

        let body = outcome.body_json().unwrap();
        assert_eq!(body["error"], "Invalid request");
        assert!(body["message"].as_str().unwrap().contains("amount"));
    }

    #[test]
    fn test_scenario_c_unknown_method_value() {
        let outcome = post(&SCENARIO_A.replace(r#""sbp""#, r#""paypal""#));
        assert_eq!(outcome.status(), Status::BadRequest);

        let message = outcome.body_json().unwrap()["message"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(message.contains("invalid enumeration value 'paypal'"));
    }

    #[test]
    fn test_scenario_d_empty_items() {
        let body = SCENARIO_A.replace(
            r#"[{"id":1,"name":"Widget","price":50,"quantity":2,"image":"img.png"}]"#,
            "[]",
        );
        let outcome = post(&body);
        assert_eq!(outcome.status(), Status::BadRequest);
        assert!(outcome
            .body()
            .unwrap()
            .contains("items: must have at least 1 item(s)"));
    }

    #[test]
    fn test_scenario_e_preflight() {
        let outcome = PaymentHandler::default().handle("OPTIONS", b"", &ctx());

        assert_eq!(outcome.status(), Status::PreflightOk);
        assert_eq!(outcome.status().http_code(), 200);
        assert_eq!(outcome.body().unwrap(), "");
        assert_eq!(outcome.content_type(), None);
        assert!(outcome
            .headers()
            .contains(&("Access-Control-Allow-Origin", "*")));
        assert!(outcome
            .headers()
            .contains(&("Access-Control-Allow-Methods", "POST, OPTIONS")));
    }

    #[test]
    fn test_scenario_f_delete_not_allowed() {
        let outcome = PaymentHandler::default().handle("DELETE", SCENARIO_A.as_bytes(), &ctx());

        assert_eq!(outcome.status(), Status::MethodNotAllowed);
        assert_eq!(outcome.status().http_code(), 405);
        assert_eq!(outcome.body().unwrap(), r#"{"error":"Method not allowed"}"#);
        assert_eq!(outcome.content_type(), Some("application/json"));
        assert!(outcome.headers().contains(&("Access-Control-Allow-Origin", "*")));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let outcome = post("{not json");
        assert_eq!(outcome.status(), Status::BadRequest);
        assert!(matches!(outcome.error(), Some(PaymentError::MalformedInput(_))));
        assert!(outcome.headers().contains(&("Content-Type", "application/json")));
    }

    #[test]
    fn test_items_count_matches_submission() {
        let body = SCENARIO_A.replace(
            r#""image":"img.png"}]"#,
            r#""image":"img.png"},{"id":2,"name":"Tape","price":5,"quantity":1,"image":""},{"id":3,"name":"Box","price":7.5,"quantity":4,"image":""}]"#,
        );
        let outcome = post(&body);
        assert_eq!(outcome.initiation().unwrap().items_count, 3);
    }

    #[test]
    fn test_order_id_independent_of_method_and_amount() {
        let sber = post(&SCENARIO_A.replace(r#""sbp""#, r#""sber""#).replace("100", "7.25"));
        assert_eq!(sber.initiation().unwrap().order_id.as_str(), "ORDER-ABCDEFGH");
    }

    #[test]
    fn test_method_classification() {
        assert_eq!(MethodClass::classify("POST"), MethodClass::Submit);
        assert_eq!(MethodClass::classify("OPTIONS"), MethodClass::Preflight);
        assert_eq!(MethodClass::classify("GET"), MethodClass::Unsupported);
        assert_eq!(MethodClass::classify("post"), MethodClass::Unsupported);
    }
}
