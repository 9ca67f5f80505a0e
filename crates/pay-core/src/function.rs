//! # Serverless Response Envelope
//!
//! The `{statusCode, headers, body, isBase64Encoded}` shape cloud-function
//! runtimes expect back from an HTTP-triggered handler.

use crate::error::PaymentError;
use crate::handler::Outcome;
use serde::Serialize;
use std::collections::BTreeMap;

/// HTTP response as a function runtime serializes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl TryFrom<&Outcome> for FunctionResponse {
    type Error = PaymentError;

    fn try_from(outcome: &Outcome) -> Result<Self, Self::Error> {
        Ok(Self {
            status_code: outcome.status().http_code(),
            headers: outcome
                .headers()
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            body: outcome.body()?,
            is_base64_encoded: false,
        })
    }
}

impl TryFrom<Outcome> for FunctionResponse {
    type Error = PaymentError;

    fn try_from(outcome: Outcome) -> Result<Self, Self::Error> {
        Self::try_from(&outcome)
    }
}
