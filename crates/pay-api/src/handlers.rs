//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//! The payment endpoint hands the method, raw body, and request id to the
//! core and renders whatever [`Outcome`] comes back.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{ErrorResponse, Outcome, PaymentError, RequestContext};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Header carrying the per-request identifier
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "boxpaper-pay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Payment initiation endpoint (any method; the core classifies it)
#[instrument(skip(state, headers, body), fields(method = %method, bytes = body.len()))]
pub async fn payment(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let ctx = request_context(&headers);
    let outcome = state.payments.handle(method.as_str(), &body, &ctx);

    match &outcome {
        Outcome::Accepted(initiation) => info!(
            request_id = ctx.request_id(),
            order_id = %initiation.order_id,
            payment_method = %initiation.payment_method,
            items = initiation.items_count,
            "Payment initiated"
        ),
        Outcome::Rejected(err) => warn!(
            request_id = ctx.request_id(),
            violations = err.violations().map_or(0, |v| v.len()),
            "Rejected payment request: {}",
            err
        ),
        Outcome::MethodNotAllowed { method } => {
            warn!(request_id = ctx.request_id(), "Method not allowed: {}", method)
        }
        Outcome::Preflight => {}
    }

    outcome_to_response(&outcome)
}

/// Context from the UUID the router stamped on the request.
///
/// Anything that does not parse as a UUID is replaced by a fresh one, so the
/// order id never carries client-chosen characters.
fn request_context(headers: &HeaderMap) -> RequestContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
        .map_or_else(RequestContext::generate, RequestContext::from)
}

fn payment_error_to_response(err: &PaymentError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string()))).into_response()
}

/// Map status, content type, and body onto an HTTP response.
/// CORS headers come from the router's `CorsLayer`.
pub fn outcome_to_response(outcome: &Outcome) -> Response {
    let body = match outcome.body() {
        Ok(body) => body,
        Err(err) => {
            error!("Failed to render response body: {}", err);
            return payment_error_to_response(&err);
        }
    };
    let status = StatusCode::from_u16(outcome.status().http_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = (status, body).into_response();
    let response_headers = response.headers_mut();
    response_headers.remove(CONTENT_TYPE);
    if let Some(content_type) = outcome.content_type() {
        response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}
