//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment handler (with its provider table) and configuration.

use pay_core::{PaymentHandler, ProviderTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit provider table file
    pub providers_config: Option<PathBuf>,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            providers_config: std::env::var("PROVIDERS_CONFIG").ok().map(PathBuf::from),
            log_json: std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            providers_config: None,
            log_json: false,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Validator + dispatcher
    pub payments: Arc<PaymentHandler>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from config, loading the provider table from disk
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let providers = load_provider_table(config.providers_config.as_deref())?;
        Ok(Self::with_providers(config, providers))
    }

    /// Create state with an explicit provider table
    pub fn with_providers(config: AppConfig, providers: ProviderTable) -> Self {
        Self {
            payments: Arc::new(PaymentHandler::new(providers)),
            config,
        }
    }

    pub fn providers(&self) -> &ProviderTable {
        self.payments.dispatcher().providers()
    }
}

/// Load the provider table from config file
fn load_provider_table(explicit: Option<&Path>) -> anyhow::Result<ProviderTable> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let table = ProviderTable::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded provider table from {}", path.display());
        return Ok(table);
    }

    // Try to load from config/providers.toml
    let config_paths = [
        "config/providers.toml",
        "../config/providers.toml",
        "../../config/providers.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let table = ProviderTable::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded provider table from {}", path);
            return Ok(table);
        }
    }

    tracing::warn!("No provider table found, using built-in templates");
    Ok(ProviderTable::default())
}
