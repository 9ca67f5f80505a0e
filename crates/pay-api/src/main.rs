//! # Boxpaper Pay
//!
//! Checkout endpoint: validates a cart and hands back a payment provider
//! redirect URL.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides
//! export PORT=8080
//! export PROVIDERS_CONFIG=config/providers.toml
//! export LOG_FORMAT=json
//!
//! # Run the server
//! boxpaper-pay
//! ```

use pay_api::{routes, state::AppConfig, state::AppState};
use pay_core::PaymentMethod;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .with((!config.log_json).then(|| fmt::layer()))
        .with(config.log_json.then(|| fmt::layer().json()))
        .init();

    // Initialize application state
    let state = AppState::new(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    for method in PaymentMethod::ALL {
        info!(
            "Provider {}: {}",
            method,
            state.providers().template(method).as_str()
        );
    }

    // Create router
    let app = routes::create_router(state);

    info!("Boxpaper Pay v{} starting on http://{}", env!("CARGO_PKG_VERSION"), addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Payment: POST http://{}/api/v1/payment", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
