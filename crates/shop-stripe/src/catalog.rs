//! # Stripe Catalog Listing
//!
//! Lists active Stripe products with their default price expanded and
//! normalizes them into [`CatalogProduct`]s.
//!
//! Price resolution happens in two passes. The first pass uses whatever the
//! product listing carries: an embedded default price with an amount, a bare
//! price id, or nothing. Products still without an amount are then looked up
//! one at a time; a failed lookup leaves the product at `"0.00"` instead of
//! failing the listing.

use crate::storefront::{parse_body, read_body, StripeStorefront};
use serde::Deserialize;
use shop_core::catalog::{
    format_decimal_minor_units, format_minor_units, product_url, sort_by_name,
};
use shop_core::{CatalogProduct, ShopError, ShopResult};
use tracing::{debug, info, instrument, warn};

/// Page size for product listing (Stripe maximum)
const PAGE_LIMIT: u32 = 100;

const UNRESOLVED_PRICE: &str = "0.00";

/// A normalized product plus whether its price came from the provider
struct ProductDraft {
    product: CatalogProduct,
    price_resolved: bool,
}

impl StripeStorefront {
    /// List, normalize and sort the active catalog
    #[instrument(skip(self))]
    pub async fn list_catalog(&self) -> ShopResult<Vec<CatalogProduct>> {
        let auth = self.config.products_auth_header()?;

        let raw = self.fetch_active_products(&auth).await?;
        let mut drafts: Vec<ProductDraft> = raw.into_iter().map(|p| self.normalize(p)).collect();

        let unresolved = drafts.iter().filter(|d| !d.price_resolved).count();
        if unresolved > 0 {
            debug!("Backfilling prices for {} products", unresolved);
        }

        // One upstream request in flight at a time.
        for draft in drafts.iter_mut().filter(|d| !d.price_resolved) {
            let product_id = draft.product.id.clone();
            let price_id = draft.product.price_id.clone();

            match self.lookup_price(&auth, &product_id, price_id.as_deref()).await {
                Ok(Some(price)) => {
                    if draft.product.price_id.is_none() {
                        draft.product.price_id = Some(price.id.clone());
                    }
                    draft.price_resolved = apply_price(&mut draft.product, &price);
                }
                Ok(None) => {
                    debug!("No active price found for product {}", product_id);
                }
                Err(e) => {
                    warn!("Price backfill failed for product {}: {}", product_id, e);
                }
            }
        }

        let mut products: Vec<CatalogProduct> = drafts.into_iter().map(|d| d.product).collect();
        sort_by_name(&mut products);

        info!("Listed {} products", products.len());
        Ok(products)
    }

    /// Fetch every active product, following pagination
    async fn fetch_active_products(&self, auth: &str) -> ShopResult<Vec<StripeProduct>> {
        let url = self.api_url("/v1/products");
        let mut products = Vec::new();
        let mut starting_after: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("active", "true".to_string()),
                ("limit", PAGE_LIMIT.to_string()),
                ("expand[]", "data.default_price".to_string()),
            ];
            if let Some(ref cursor) = starting_after {
                query.push(("starting_after", cursor.clone()));
            }

            let response = self
                .client
                .get(&url)
                .header("Authorization", auth)
                .header("Stripe-Version", &self.config.api_version)
                .query(&query)
                .send()
                .await
                .map_err(|e| ShopError::Network(e.to_string()))?;

            let body = read_body(response, "Failed to fetch products").await?;
            let page: StripeList<StripeProduct> = parse_body(&body)?;

            let has_more = page.has_more;
            starting_after = page.data.last().map(|p| p.id.clone());
            products.extend(page.data);

            if !has_more || starting_after.is_none() {
                break;
            }
        }

        Ok(products)
    }

    /// Look up a price by id, or the first active price of the product when
    /// no id is known
    async fn lookup_price(
        &self,
        auth: &str,
        product_id: &str,
        price_id: Option<&str>,
    ) -> ShopResult<Option<StripePrice>> {
        match price_id {
            Some(id) => {
                let response = self
                    .client
                    .get(self.api_url(&format!("/v1/prices/{}", id)))
                    .header("Authorization", auth)
                    .header("Stripe-Version", &self.config.api_version)
                    .send()
                    .await
                    .map_err(|e| ShopError::Network(e.to_string()))?;

                let body = read_body(response, "Failed to fetch price").await?;
                parse_body(&body).map(Some)
            }
            None => {
                let response = self
                    .client
                    .get(self.api_url("/v1/prices"))
                    .header("Authorization", auth)
                    .header("Stripe-Version", &self.config.api_version)
                    .query(&[("product", product_id), ("active", "true"), ("limit", "1")])
                    .send()
                    .await
                    .map_err(|e| ShopError::Network(e.to_string()))?;

                let body = read_body(response, "Failed to fetch prices").await?;
                let list: StripeList<StripePrice> = parse_body(&body)?;

                Ok(list.data.into_iter().find(|p| {
                    p.active && p.product.as_deref().map_or(true, |owner| owner == product_id)
                }))
            }
        }
    }

    /// First-pass normalization from the product listing alone
    fn normalize(&self, product: StripeProduct) -> ProductDraft {
        let images = self.images.resolve_all(&product.images);

        let mut normalized = CatalogProduct {
            url: product_url(&product.name),
            id: product.id,
            name: product.name,
            description: product.description.unwrap_or_default(),
            price: UNRESOLVED_PRICE.to_string(),
            price_id: None,
            currency: self.config.currency.as_str().to_string(),
            image: images.first().cloned(),
            images,
        };

        let price_resolved = match product.default_price {
            Some(DefaultPrice::Expanded(price)) => {
                normalized.price_id = Some(price.id.clone());
                apply_price(&mut normalized, &price)
            }
            Some(DefaultPrice::Id(id)) => {
                normalized.price_id = Some(id);
                false
            }
            None => false,
        };

        ProductDraft {
            product: normalized,
            price_resolved,
        }
    }
}

/// Copy amount and currency from a price. Returns whether an amount was found.
fn apply_price(product: &mut CatalogProduct, price: &StripePrice) -> bool {
    if let Some(currency) = price.currency.as_deref().filter(|c| !c.is_empty()) {
        product.currency = currency.to_lowercase();
    }

    match display_amount(price) {
        Some(amount) => {
            product.price = amount;
            true
        }
        None => false,
    }
}

fn display_amount(price: &StripePrice) -> Option<String> {
    match (price.unit_amount, price.unit_amount_decimal.as_deref()) {
        (Some(amount), _) => Some(format_minor_units(amount)),
        (None, Some(decimal)) => format_decimal_minor_units(decimal),
        (None, None) => None,
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct StripeProduct {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    default_price: Option<DefaultPrice>,
}

/// `default_price` is either expanded or a bare id
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DefaultPrice {
    Expanded(StripePrice),
    Id(String),
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    id: String,
    #[serde(default)]
    unit_amount: Option<i64>,
    #[serde(default)]
    unit_amount_decimal: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default)]
    product: Option<String>,
}

fn default_true() -> bool {
    true
}
