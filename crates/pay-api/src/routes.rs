//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers::{self, REQUEST_ID_HEADER};
use crate::state::AppState;
use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, Method},
    middleware::{self, Next},
    response::Response,
    routing::{any, get},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// How long browsers may cache a preflight answer
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86400);

/// Create the main application router
///
/// Routes:
/// - ANY /api/v1/payment - Payment initiation (POST), preflight (OPTIONS),
///   405 for anything else
/// - GET /health, GET / - Health check
///
/// Every request gets a server-minted x-request-id; one sent by the client
/// is dropped. Preflight requests are answered by the `CorsLayer`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(PREFLIGHT_MAX_AGE);

    let api_routes = Router::new().route("/payment", any(handlers::payment));

    let layers = ServiceBuilder::new()
        .layer(middleware::from_fn(drop_client_request_id))
        // Stamp x-request-id before anything reads it
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(layers)
        // State
        .with_state(state)
}

/// The order id is derived from x-request-id, so only the server may set it
async fn drop_client_request_id(mut request: Request, next: Next) -> Response {
    request.headers_mut().remove(REQUEST_ID_HEADER);
    next.run(request).await
}
