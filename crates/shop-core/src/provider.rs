//! # Storefront Provider Trait
//!
//! Seam between the HTTP layer and the payment/catalog provider.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 StorefrontProvider (trait)                  │
//! │  ├── list_products()                                        │
//! │  ├── fetch_image()                                          │
//! │  ├── checkout_ready()                                       │
//! │  ├── create_checkout()                                      │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │StripeStorefront│
//!                    └───────────────┘
//! ```

use crate::catalog::CatalogProduct;
use crate::checkout::{CheckoutOrder, CheckoutSession};
use crate::error::ShopResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Fallback content type for proxied images
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Bytes of a provider-hosted file, ready to re-serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedImage {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Core trait for provider implementations.
///
/// Each call is a single stateless round trip (plus the catalog's price
/// backfill); implementations hold no per-request state.
#[async_trait]
pub trait StorefrontProvider: Send + Sync {
    /// List active products, normalized and sorted by name.
    async fn list_products(&self) -> ShopResult<Vec<CatalogProduct>>;

    /// Fetch a provider file-download link.
    ///
    /// Links that are not provider file links fail with
    /// [`crate::ShopError::InvalidFileLink`] before any request is made.
    async fn fetch_image(&self, link: &str) -> ShopResult<ProxiedImage>;

    /// Check that checkout credentials are present.
    ///
    /// Called before the cart is validated, so a misconfigured deployment
    /// reports itself even for a bad request.
    fn checkout_ready(&self) -> ShopResult<()> {
        Ok(())
    }

    /// Create a hosted checkout session for the order.
    async fn create_checkout(&self, order: &CheckoutOrder) -> ShopResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed provider (dynamic dispatch)
pub type BoxedProvider = Arc<dyn StorefrontProvider>;

