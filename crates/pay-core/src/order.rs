//! # Order Identifiers
//!
//! Display codes derived from the invocation's request identifier.

use crate::error::{PaymentError, PaymentResult};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Characters of the request id that make it into the order id
pub const ORDER_ID_SOURCE_LEN: usize = 8;

/// Prefix of every order id
pub const ORDER_ID_PREFIX: &str = "ORDER-";

/// Per-invocation context supplied by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Wrap a request id. It must be long enough to derive an order id from
    /// and made of URL-unreserved characters only, since the order id is
    /// substituted into provider URLs as-is.
    pub fn new(request_id: impl Into<String>) -> PaymentResult<Self> {
        let request_id = request_id.into();
        let len = request_id.chars().count();
        if len < ORDER_ID_SOURCE_LEN {
            return Err(PaymentError::InvalidContext(format!(
                "request id must have at least {} characters, got {}",
                ORDER_ID_SOURCE_LEN, len
            )));
        }
        if let Some(bad) = request_id.chars().find(|c| !is_unreserved(*c)) {
            return Err(PaymentError::InvalidContext(format!(
                "request id contains {:?}, which is not URL-safe",
                bad
            )));
        }
        Ok(Self { request_id })
    }

    /// Fresh context from a v4 UUID
    pub fn generate() -> Self {
        Self::from(Uuid::new_v4())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

/// RFC 3986 unreserved characters
fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

impl From<Uuid> for RequestContext {
    fn from(id: Uuid) -> Self {
        Self {
            request_id: id.hyphenated().to_string(),
        }
    }
}

/// `ORDER-` followed by the upper-cased head of the request id.
/// Never persisted; only used to fill provider URLs and echo back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn from_context(ctx: &RequestContext) -> Self {
        let head: String = ctx
            .request_id()
            .chars()
            .take(ORDER_ID_SOURCE_LEN)
            .collect();
        Self(format!("{}{}", ORDER_ID_PREFIX, head.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
