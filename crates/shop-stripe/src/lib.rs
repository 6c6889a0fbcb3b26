//! # shop-stripe
//!
//! Stripe provider for the printshop storefront.
//!
//! [`StripeStorefront`] implements `shop_core::StorefrontProvider` with:
//!
//! 1. **Catalog listing** - active products with the default price expanded,
//!    prices backfilled one product at a time when missing
//! 2. **File links** - fetches Stripe file-download links for the image proxy
//! 3. **Checkout Sessions** - hosted checkout for a cart priced via the
//!    static catalog
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::StripeStorefront;
//! use shop_core::StorefrontProvider;
//!
//! // Keys come from STRIPE_API_KEY_PRODUCTS / STRIPE_SECRET_KEY
//! let storefront = StripeStorefront::from_env()?;
//!
//! let products = storefront.list_products().await?;
//! let session = storefront.create_checkout(&order).await?;
//!
//! // Redirect user to session.url
//! ```

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod files;
pub mod storefront;

// Re-exports
pub use config::StripeConfig;
pub use storefront::StripeStorefront;
