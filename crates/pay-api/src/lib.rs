//! # pay-api
//!
//! HTTP API layer for boxpaper-pay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The payment initiation endpoint, backed by `pay-core`
//! - Request-id stamping and tracing middleware
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/payment` | Validate cart, return provider redirect |
//! | OPTIONS | `/api/v1/payment` | CORS preflight |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
