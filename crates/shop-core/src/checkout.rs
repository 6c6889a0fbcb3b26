//! # Checkout Types
//!
//! Checkout order assembly for the printshop. A cart is turned into one
//! line item per entry, each priced through the static catalog.

use crate::error::{ShopError, ShopResult};
use crate::product::{Currency, ProductCatalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countries the hosted checkout accepts shipping addresses for
/// (ISO 3166-1 alpha-2)
pub const DEFAULT_SHIPPING_COUNTRIES: [&str; 20] = [
    "IE", "GB", "US", "CA", "AU", "NZ", "FR", "DE", "IT", "ES", "NL", "BE", "AT", "CH", "SE",
    "NO", "DK", "FI", "PL", "PT",
];

/// Fixed checkout settings sent with every session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Charge currency
    pub currency: Currency,
    /// Shipping destinations
    pub allowed_countries: Vec<String>,
    /// Require a billing address
    pub require_billing_address: bool,
    /// Require a phone number
    pub collect_phone: bool,
}

impl CheckoutPolicy {
    /// Builder: set currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            currency: Currency::EUR,
            allowed_countries: DEFAULT_SHIPPING_COUNTRIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            require_billing_address: true,
            collect_phone: true,
        }
    }
}

/// A priced line in a checkout order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    /// Provider price identifier
    pub price_id: String,
    pub quantity: u32,
}

/// One cart entry as posted to checkout.
///
/// Only the product id is read; the display copies a client keeps next to it
/// are ignored whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCartEntry {
    pub id: String,
}

impl CheckoutCartEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// An order ready to be handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub line_items: Vec<CheckoutLineItem>,
    /// URL to redirect after successful payment
    pub success_url: String,
    /// URL to redirect if customer cancels
    pub cancel_url: String,
}

impl CheckoutOrder {
    /// Build an order from cart entries.
    ///
    /// Every entry becomes its own line item at quantity 1. Fails on an empty
    /// cart or on the first entry missing from the catalog.
    pub fn from_cart(
        cart: &[CheckoutCartEntry],
        catalog: &ProductCatalog,
        urls: RedirectUrls,
    ) -> ShopResult<Self> {
        if cart.is_empty() {
            return Err(ShopError::InvalidRequest(
                "Cart is empty or invalid".to_string(),
            ));
        }

        let line_items = cart
            .iter()
            .map(|item| {
                catalog
                    .price_id_for(&item.id)
                    .map(|price_id| CheckoutLineItem {
                        price_id: price_id.to_string(),
                        quantity: 1,
                    })
                    .ok_or_else(|| ShopError::ProductNotFound {
                        product_id: item.id.clone(),
                    })
            })
            .collect::<ShopResult<Vec<_>>>()?;

        Ok(Self {
            line_items,
            success_url: urls.success_url,
            cancel_url: urls.cancel_url,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Total number of units across line items
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }
}

/// Success/cancel redirect pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Default cart-page redirects relative to the storefront origin
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            success_url: format!("{}/cart/index.html?success=true", origin),
            cancel_url: format!("{}/cart/index.html?canceled=true", origin),
        }
    }

    /// Use explicit URLs where given, the origin defaults otherwise
    pub fn resolve(origin: &str, success_url: Option<String>, cancel_url: Option<String>) -> Self {
        let defaults = Self::for_origin(origin);
        Self {
            success_url: success_url
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.success_url),
            cancel_url: cancel_url
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.cancel_url),
        }
    }
}

/// A hosted checkout session created by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// URL to redirect customer to for payment
    pub url: String,

    /// When the session expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::CatalogEntry;

    fn catalog() -> ProductCatalog {
        ProductCatalog::new()
            .with_entry(CatalogEntry::new("prod_A", "price_A", "Sunrise", "30.00"))
            .with_entry(CatalogEntry::new("prod_B", "price_B", "The Entity", "70.00"))
    }

    fn item(id: &str) -> CheckoutCartEntry {
        CheckoutCartEntry::new(id)
    }

    #[test]
    fn test_duplicates_become_separate_line_items() {
        let cart = vec![item("prod_A"), item("prod_A"), item("prod_B")];
        let order =
            CheckoutOrder::from_cart(&cart, &catalog(), RedirectUrls::for_origin("https://shop.ie"))
                .unwrap();

        assert_eq!(order.line_items.len(), 3);
        assert!(order.line_items.iter().all(|li| li.quantity == 1));
        assert_eq!(order.line_items[0].price_id, "price_A");
        assert_eq!(order.line_items[1].price_id, "price_A");
        assert_eq!(order.line_items[2].price_id, "price_B");
        assert_eq!(order.item_count(), 3);
    }

    #[test]
    fn test_unknown_product_is_named() {
        let cart = vec![item("prod_A"), item("prod_X")];
        let err =
            CheckoutOrder::from_cart(&cart, &catalog(), RedirectUrls::for_origin("https://shop.ie"))
                .unwrap_err();

        assert!(matches!(err, ShopError::ProductNotFound { ref product_id } if product_id == "prod_X"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_entry_reads_only_the_id() {
        let entries: Vec<CheckoutCartEntry> = serde_json::from_value(serde_json::json!([
            {"id": "prod_A", "name": "Sunrise", "price": 30, "description": null},
            {"id": "prod_B", "price": {"amount": 70}}
        ]))
        .unwrap();

        assert_eq!(entries, vec![item("prod_A"), item("prod_B")]);
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err =
            CheckoutOrder::from_cart(&[], &catalog(), RedirectUrls::for_origin("https://shop.ie"))
                .unwrap_err();
        assert_eq!(err.to_string(), "Cart is empty or invalid");
    }

    #[test]
    fn test_redirect_defaults() {
        let urls = RedirectUrls::resolve("https://shop.ie/", None, Some(String::new()));
        assert_eq!(urls.success_url, "https://shop.ie/cart/index.html?success=true");
        assert_eq!(urls.cancel_url, "https://shop.ie/cart/index.html?canceled=true");

        let urls = RedirectUrls::resolve(
            "https://shop.ie",
            Some("https://shop.ie/thanks".into()),
            None,
        );
        assert_eq!(urls.success_url, "https://shop.ie/thanks");
    }

    #[test]
    fn test_default_policy() {
        let policy = CheckoutPolicy::default();
        assert_eq!(policy.currency, Currency::EUR);
        assert_eq!(policy.allowed_countries.len(), 20);
        assert_eq!(policy.allowed_countries[0], "IE");
        assert!(policy.require_billing_address);
        assert!(policy.collect_phone);
    }
}
