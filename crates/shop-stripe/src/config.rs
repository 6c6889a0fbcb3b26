//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! Secrets are loaded from environment variables.
//!
//! The two keys are optional at startup: a missing key fails only the
//! endpoints that need it, with a configuration error.

use shop_core::{Currency, ShopError, ShopResult};
use std::env;
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Key used for catalog and price reads (`STRIPE_API_KEY_PRODUCTS`)
    pub products_key: Option<String>,

    /// Secret key used to create checkout sessions (`STRIPE_SECRET_KEY`)
    pub secret_key: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Base URL of provider-hosted files; also the only origin the image
    /// proxy will fetch from
    pub files_base_url: String,

    /// API version
    pub api_version: String,

    /// Currency charged at checkout and assumed when a price omits one
    pub currency: Currency,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Env vars:
    /// - `STRIPE_API_KEY_PRODUCTS`
    /// - `STRIPE_SECRET_KEY`
    /// - `STRIPE_API_BASE_URL` (optional)
    /// - `STRIPE_FILES_BASE_URL` (optional)
    /// - `CHECKOUT_CURRENCY` (optional, default `eur`)
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let products_key = non_empty_var("STRIPE_API_KEY_PRODUCTS");
        let secret_key = non_empty_var("STRIPE_SECRET_KEY");

        // Validate key formats (restricted keys are fine for catalog reads)
        if let Some(key) = &products_key {
            if !is_stripe_key(key) {
                warn!("STRIPE_API_KEY_PRODUCTS does not look like a Stripe key");
            }
        }
        if let Some(key) = &secret_key {
            if !key.starts_with("sk_test_") && !key.starts_with("sk_live_") {
                warn!("STRIPE_SECRET_KEY should start with sk_test_ or sk_live_");
            }
        }

        let currency = match non_empty_var("CHECKOUT_CURRENCY") {
            Some(code) => code.parse().map_err(ShopError::Configuration)?,
            None => Currency::default(),
        };

        Ok(Self {
            products_key,
            secret_key,
            api_base_url: non_empty_var("STRIPE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            files_base_url: non_empty_var("STRIPE_FILES_BASE_URL")
                .unwrap_or_else(|| shop_core::catalog::DEFAULT_FILES_BASE_URL.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            currency,
        })
    }

    /// Create config with no keys (for testing)
    pub fn new() -> Self {
        Self {
            products_key: None,
            secret_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            files_base_url: shop_core::catalog::DEFAULT_FILES_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            currency: Currency::default(),
        }
    }

    /// Builder: set the catalog read key
    pub fn with_products_key(mut self, key: impl Into<String>) -> Self {
        self.products_key = Some(key.into());
        self
    }

    /// Builder: set the checkout secret key
    pub fn with_secret_key(mut self, key: impl Into<String>) -> Self {
        self.secret_key = Some(key.into());
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set custom files base URL (for testing)
    pub fn with_files_base_url(mut self, url: impl Into<String>) -> Self {
        self.files_base_url = url.into();
        self
    }

    /// Authorization header for catalog reads
    pub fn products_auth_header(&self) -> ShopResult<String> {
        self.products_key
            .as_ref()
            .map(|key| format!("Bearer {}", key))
            .ok_or_else(|| {
                ShopError::Configuration(
                    "Stripe API key not configured. Please set STRIPE_API_KEY_PRODUCTS in the environment."
                        .to_string(),
                )
            })
    }

    /// Authorization header for checkout session creation
    pub fn checkout_auth_header(&self) -> ShopResult<String> {
        self.secret_key
            .as_ref()
            .map(|key| format!("Bearer {}", key))
            .ok_or_else(|| ShopError::Configuration("Stripe API key not configured".to_string()))
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key
            .as_deref()
            .map(|k| k.starts_with("sk_test_"))
            .unwrap_or(false)
    }
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn is_stripe_key(key: &str) -> bool {
    ["sk_test_", "sk_live_", "rk_test_", "rk_live_"]
        .iter()
        .any(|prefix| key.starts_with(prefix))
}
