//! # shop-core
//!
//! Core types and traits for the printshop storefront.
//!
//! This crate provides:
//! - `StorefrontProvider` trait for the catalog/checkout provider
//! - `CatalogProduct` and the normalization helpers behind the catalog listing
//! - `ProductCatalog`, the static product → price table
//! - `CheckoutOrder` assembly from a cart
//! - `Cart` and `CartRepository` over a scoped key-value store
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{CheckoutOrder, ProductCatalog, RedirectUrls, StorefrontProvider};
//!
//! let catalog = ProductCatalog::from_toml(&std::fs::read_to_string("config/catalog.toml")?)?;
//!
//! // Price the cart through the static table
//! let order = CheckoutOrder::from_cart(&cart, &catalog, RedirectUrls::for_origin("https://shop.ie"))?;
//!
//! // Redirect the buyer to session.url
//! let session = provider.create_checkout(&order).await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod product;
pub mod provider;

// Re-exports for convenience
pub use cart::{Cart, CartItem, CartRepository, KeyValueStore, MemoryStore, CART_STORAGE_KEY};
pub use catalog::{product_url, slugify, CatalogProduct, ImageResolver};
pub use checkout::{
    CheckoutCartEntry, CheckoutLineItem, CheckoutOrder, CheckoutPolicy, CheckoutSession, RedirectUrls,
};
pub use error::{ShopError, ShopResult};
pub use product::{CatalogEntry, Currency, ProductCatalog};
pub use provider::{BoxedProvider, ProxiedImage, StorefrontProvider, DEFAULT_IMAGE_CONTENT_TYPE};
