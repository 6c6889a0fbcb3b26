//! # Stripe Storefront
//!
//! `StorefrontProvider` implementation backed by the Stripe REST API.
//! The endpoint-specific work lives in [`crate::catalog`], [`crate::files`]
//! and [`crate::checkout`].

use crate::config::StripeConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use shop_core::{
    CatalogProduct, CheckoutOrder, CheckoutPolicy, CheckoutSession, ImageResolver, ProxiedImage,
    ShopError, ShopResult, StorefrontProvider,
};
use tracing::error;

/// Stripe-backed storefront
pub struct StripeStorefront {
    pub(crate) config: StripeConfig,
    pub(crate) client: Client,
    pub(crate) images: ImageResolver,
    pub(crate) policy: CheckoutPolicy,
}

impl StripeStorefront {
    /// Create a new Stripe storefront
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShopError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let images = ImageResolver::new(config.files_base_url.clone());
        let policy = CheckoutPolicy::default().with_currency(config.currency);

        Ok(Self {
            config,
            client,
            images,
            policy,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Builder: override the checkout policy
    pub fn with_policy(mut self, policy: CheckoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl StorefrontProvider for StripeStorefront {
    async fn list_products(&self) -> ShopResult<Vec<CatalogProduct>> {
        self.list_catalog().await
    }

    async fn fetch_image(&self, link: &str) -> ShopResult<ProxiedImage> {
        self.fetch_file_link(link).await
    }

    fn checkout_ready(&self) -> ShopResult<()> {
        self.config.checkout_auth_header().map(|_| ())
    }

    async fn create_checkout(&self, order: &CheckoutOrder) -> ShopResult<CheckoutSession> {
        self.create_session(order).await
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

/// Read a response body as text, turning a non-2xx status into
/// [`ShopError::Upstream`] carrying that body.
pub(crate) async fn read_body(response: Response, context: &str) -> ShopResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ShopError::Network(e.to_string()))?;

    if !status.is_success() {
        error!("Stripe API error: status={}, body={}", status, body);
        return Err(ShopError::upstream(context, status.as_u16(), body));
    }

    Ok(body)
}

/// Parse a JSON body into a Stripe API type
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> ShopResult<T> {
    serde_json::from_str(body)
        .map_err(|e| ShopError::Serialization(format!("Failed to parse Stripe response: {}", e)))
}
