//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the storefront provider, configuration, and the static catalog.

use anyhow::Context;
use shop_core::{BoxedProvider, ProductCatalog};
use shop_stripe::StripeStorefront;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Catalog locations tried when `CATALOG_PATH` is unset
const CATALOG_SEARCH_PATHS: [&str; 3] = [
    "config/catalog.toml",
    "../config/catalog.toml",
    "../../config/catalog.toml",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public origin, used when a request carries no `Host`
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog file
    pub catalog_path: Option<String>,
    /// Emit JSON log lines
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup, applying defaults for missing values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            base_url: var("BASE_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            catalog_path: var("CATALOG_PATH"),
            json_logs: var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
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
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Catalog and checkout provider
    pub provider: BoxedProvider,
    /// Static product → price table
    pub catalog: Arc<ProductCatalog>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state backed by Stripe, reading keys from the environment
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let catalog = load_product_catalog(config.catalog_path.as_deref())?;

        let storefront = StripeStorefront::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(config, catalog, Arc::new(storefront)))
    }

    /// Assemble state from parts
    pub fn with_provider(
        config: AppConfig,
        catalog: ProductCatalog,
        provider: BoxedProvider,
    ) -> Self {
        Self {
            provider,
            catalog: Arc::new(catalog),
            config,
        }
    }
}

/// Load the product catalog.
///
/// An explicit path must exist; otherwise the usual locations are searched
/// and an empty catalog is used when none is found.
pub fn load_product_catalog(explicit: Option<&str>) -> anyhow::Result<ProductCatalog> {
    if let Some(path) = explicit {
        return read_catalog(Path::new(path));
    }

    for path in CATALOG_SEARCH_PATHS {
        let path = Path::new(path);
        if path.is_file() {
            return read_catalog(path);
        }
    }

    tracing::warn!("No product catalog found, every checkout will be rejected");
    Ok(ProductCatalog::new())
}

fn read_catalog(path: &Path) -> anyhow::Result<ProductCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let catalog = ProductCatalog::from_toml(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded {} products from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.environment, "development");
        assert!(config.catalog_path.is_none());
        assert!(!config.json_logs);
    }

    #[test]
    fn test_app_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("BASE_URL", "https://shop.example"),
            ("ENVIRONMENT", "production"),
            ("LOG_FORMAT", "JSON"),
            ("CATALOG_PATH", ""),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url, "https://shop.example");
        assert!(config.is_production());
        assert!(config.json_logs);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = AppConfig::from_lookup(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");

        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_load_explicit_catalog() {
        let path = std::env::temp_dir().join(format!("printshop-catalog-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[[products]]
id = "prod_A"
price_id = "price_A"
name = "Print A"
price = "25.00"
"#,
        )
        .unwrap();

        let catalog = load_product_catalog(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.price_id_for("prod_A"), Some("price_A"));
    }

    #[test]
    fn test_missing_explicit_catalog_is_an_error() {
        assert!(load_product_catalog(Some("/nonexistent/catalog.toml")).is_err());
    }

    #[test]
    fn test_bundled_catalog_is_found() {
        // crate tests run from crates/shop-api, two levels below config/
        let catalog = load_product_catalog(None).unwrap();
        assert_eq!(catalog.len(), 19);
    }
}
