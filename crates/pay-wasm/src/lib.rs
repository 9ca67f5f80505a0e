//! # pay-wasm
//!
//! WebAssembly bindings for boxpaper-pay.
//!
//! This crate provides WASM-compatible functions for:
//! - Running the payment handler at the edge (serverless response envelope)
//! - Validating checkout forms client-side before submitting
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { handle_request, validate_request } from 'boxpaper-pay-wasm';
//!
//! await init();
//!
//! const check = JSON.parse(validate_request(JSON.stringify(cart)));
//! if (!check.valid) showErrors(check.violations);
//!
//! const response = JSON.parse(handle_request('POST', body, crypto.randomUUID()));
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use pay_core::{
    FunctionResponse, PaymentError, PaymentHandler, PaymentMethod, RequestContext, Violation,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Result of a client-side validation pass
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    violations: Vec<&'a Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Handle one invocation and return the serverless response envelope as JSON
#[wasm_bindgen]
pub fn handle_request(method: &str, body: &str, request_id: &str) -> Result<String, JsValue> {
    let response = respond(method, body, request_id).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&response)
}

fn respond(method: &str, body: &str, request_id: &str) -> Result<FunctionResponse, PaymentError> {
    let ctx = RequestContext::new(request_id)?;
    let outcome = PaymentHandler::default().handle(method, body.as_bytes(), &ctx);
    FunctionResponse::try_from(outcome)
}

/// Validate a checkout body without dispatching it
#[wasm_bindgen]
pub fn validate_request(body: &str) -> Result<String, JsValue> {
    let result = pay_core::validate_request(body.as_bytes());
    let report = match &result {
        Ok(_) => ValidationReport {
            valid: true,
            violations: Vec::new(),
            error: None,
        },
        Err(PaymentError::SchemaViolation(violations)) => ValidationReport {
            valid: false,
            violations: violations.iter().collect(),
            error: None,
        },
        Err(err) => ValidationReport {
            valid: false,
            violations: Vec::new(),
            error: Some(err.to_string()),
        },
    };
    to_json(&report)
}

/// Supported payment method codes as a JSON array
#[wasm_bindgen]
pub fn payment_methods() -> Result<String, JsValue> {
    to_json(&PaymentMethod::codes())
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const BODY: &str = r#"{"amount":100,"paymentMethod":"sber","customerInfo":{"fullName":"A","email":"a@a.com","phone":"1","address":"x","city":"y"},"items":[{"id":1,"name":"Widget","price":50,"quantity":2,"image":"img.png"}]}"#;

    #[test]
    fn test_respond_success_envelope() {
        let response = respond("POST", BODY, "abcdefgh-1234").unwrap();

        assert_eq!(response.status_code, 200);
        assert!(!response.is_base64_encoded);
        assert_eq!(response.headers["Content-Type"], "application/json");

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["orderId"], "ORDER-ABCDEFGH");
        assert!(body["paymentUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://securepayments.sberbank.ru/payment"));
    }

    #[test]
    fn test_respond_rejects_short_request_id() {
        let err = respond("POST", BODY, "short").unwrap_err();
        assert!(matches!(err, PaymentError::InvalidContext(_)));
    }

    #[test]
    fn test_respond_rejects_url_unsafe_request_id() {
        let err = respond("POST", BODY, "a?x=1#zzzzzz").unwrap_err();
        assert!(matches!(err, PaymentError::InvalidContext(_)));
    }

    #[test]
    fn test_validate_request_report() {
        let report: Value = serde_json::from_str(&validate_request(BODY).unwrap()).unwrap();
        assert_eq!(report["valid"], true);
        assert!(report.get("error").is_none());

        let bad = BODY.replace(r#""amount":100"#, r#""amount":-3"#);
        let report: Value = serde_json::from_str(&validate_request(&bad).unwrap()).unwrap();
        assert_eq!(report["valid"], false);
        assert_eq!(report["violations"][0]["field"], "amount");
        assert_eq!(report["violations"][0]["constraint"]["kind"], "greater_than");
    }

    #[test]
    fn test_validate_request_malformed() {
        let report: Value = serde_json::from_str(&validate_request("nope").unwrap()).unwrap();
        assert_eq!(report["valid"], false);
        assert!(report["error"].as_str().unwrap().starts_with("Malformed"));
    }

    #[test]
    fn test_payment_methods() {
        assert_eq!(payment_methods().unwrap(), r#"["sbp","tbank","sber"]"#);
    }
}
