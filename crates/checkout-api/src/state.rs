//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment provider, item catalog, page renderer and config.
//! Everything here is immutable after startup.

use crate::pages::PageRenderer;
use anyhow::Context;
use checkout_core::{BoxedPaymentProvider, ItemCatalog};
use checkout_stripe::{StripeConfig, StripeProvider};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Provider placeholder, substituted by Stripe with the real session id
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used to build provider return URLs
    pub base_url: String,
    /// Directory holding page templates and the client script
    pub public_dir: PathBuf,
    /// Explicit item catalog path (otherwise searched for)
    pub catalog_path: Option<PathBuf>,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            base_url: lookup("BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", port)),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Where the embedded checkout sends the customer when done
    pub fn checkout_return_url(&self) -> String {
        format!("{}/success?session_id={}", self.base_url, SESSION_ID_PLACEHOLDER)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// External payment provider
    pub provider: BoxedPaymentProvider,
    /// Trusted prices
    pub catalog: Arc<ItemCatalog>,
    /// Page templates and client script
    pub pages: PageRenderer,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe.
    ///
    /// Fails fast when the Stripe keys are missing or malformed.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_item_catalog(&config)?;

        let stripe_config = StripeConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        if stripe_config.is_test_mode() {
            tracing::info!("Stripe keys: test mode");
        } else {
            tracing::warn!("Stripe keys: LIVE mode, real payments will be taken");
        }

        let stripe = StripeProvider::new(stripe_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(config, Arc::new(stripe), catalog))
    }

    /// Assemble state around any provider
    pub fn with_provider(
        config: AppConfig,
        provider: BoxedPaymentProvider,
        catalog: ItemCatalog,
    ) -> Self {
        Self {
            provider,
            catalog: Arc::new(catalog),
            pages: PageRenderer::new(&config.public_dir),
            config,
        }
    }
}

/// Load item catalog from config file
pub fn load_item_catalog(config: &AppConfig) -> anyhow::Result<ItemCatalog> {
    if let Some(path) = &config.catalog_path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog = ItemCatalog::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded {} items from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    let config_paths = [
        "config/items.toml",
        "../config/items.toml",
        "../../config/items.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = ItemCatalog::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", path))?;
            tracing::info!("Loaded {} items from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    // Every checkout will fail until a catalog is provided
    tracing::warn!("No item catalog found, using empty catalog");
    Ok(ItemCatalog::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert!(config.catalog_path.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_base_url_follows_port() {
        let config = AppConfig::from_lookup(|name| match name {
            "PORT" => Some("8443".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:8443");

        let config = AppConfig::from_lookup(|name| match name {
            "BASE_URL" => Some("https://shop.example.com/".to_string()),
            _ => None,
        });
        assert_eq!(
            config.checkout_return_url(),
            "https://shop.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
    }

    #[test]
    fn test_socket_addr() {
        let mut config = AppConfig::from_lookup(|_| None);
        config.host = "0.0.0.0".to_string();

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        config.host = "not a host".to_string();
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_explicit_catalog_path_must_exist() {
        let mut config = AppConfig::from_lookup(|_| None);
        config.catalog_path = Some(PathBuf::from("/nonexistent/items.toml"));
        assert!(load_item_catalog(&config).is_err());
    }

    #[test]
    fn test_repo_catalog_parses() {
        let mut config = AppConfig::from_lookup(|_| None);
        config.catalog_path = Some(
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/items.toml"),
        );
        let catalog = load_item_catalog(&config).unwrap();
        assert!(catalog.items.iter().any(|item| item.active));
    }
}
