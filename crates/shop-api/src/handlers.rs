//! # Request Handlers
//!
//! Axum request handlers for the storefront API.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{CatalogProduct, CheckoutCartEntry, CheckoutOrder, RedirectUrls, ShopError};
use tracing::{error, info, instrument, warn};

/// Browsers may cache proxied images for a year
const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Catalog listing response
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<CatalogProduct>,
}

/// Image proxy query
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    #[serde(default)]
    pub url: Option<String>,
}

/// Create checkout request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Cart entries; only their product ids are read
    pub cart: Vec<CheckoutCartEntry>,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Hosted checkout URL (redirect user here)
    pub url: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "printshop",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List active products with prices and images
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = state.provider.list_products().await.map_err(|e| {
        error!("Failed to list products: {}", e);
        ApiError(e)
    })?;

    info!("Listed {} products", products.len());

    Ok(Json(ProductsResponse { products }))
}

/// Re-serve a file-download link from the provider's file host
#[instrument(skip(state, query))]
pub async fn proxy_image(
    State(state): State<AppState>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let link = query
        .map_err(|e| warn!("Rejected image query: {}", e))
        .ok()
        .and_then(|Query(q)| q.url)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ShopError::InvalidRequest("Missing url parameter".to_string()))?;

    let image = state.provider.fetch_image(&link).await.map_err(|e| {
        warn!("Image proxy failed for {}: {}", link, e);
        ApiError(e)
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.body,
    )
        .into_response())
}

/// Create a hosted checkout session for the cart
#[instrument(skip_all)]
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    state.provider.checkout_ready().map_err(|e| {
        error!("Checkout unavailable: {}", e);
        ApiError(e)
    })?;

    let Json(request) = request.map_err(|e| {
        warn!("Rejected checkout body: {}", e);
        ShopError::InvalidRequest("Cart is empty or invalid".to_string())
    })?;

    let origin = request_origin(&headers, &state.config.base_url);
    let urls = RedirectUrls::resolve(&origin, request.success_url, request.cancel_url);
    let order = CheckoutOrder::from_cart(&request.cart, &state.catalog, urls)?;

    info!(
        "Creating checkout: {} items, success_url={}",
        order.item_count(),
        order.success_url
    );

    let session = state.provider.create_checkout(&order).await.map_err(|e| {
        error!("Failed to create checkout: {}", e);
        ApiError(e)
    })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CheckoutResponse { url: session.url }))
}

/// Fallback for methods a route does not serve
pub async fn method_not_allowed() -> ApiError {
    ApiError(ShopError::MethodNotAllowed)
}

/// Origin the storefront was reached on.
///
/// Uses `Host` with `X-Forwarded-Proto` (or the scheme of `fallback`), and
/// `fallback` itself when there is no `Host`.
pub fn request_origin(headers: &HeaderMap, fallback: &str) -> String {
    let fallback = fallback.trim_end_matches('/');

    let Some(host) = header_str(headers, header::HOST.as_str()) else {
        return fallback.to_string();
    };

    let proto = header_str(headers, "x-forwarded-proto")
        .and_then(|p| p.split(',').next())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| fallback.split("://").next().unwrap_or("http"));

    format!("{}://{}", proto, host)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_origin_from_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("prints.example"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));

        assert_eq!(
            request_origin(&headers, "http://localhost:8080"),
            "https://prints.example"
        );
    }

    #[test]
    fn test_origin_uses_fallback_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("127.0.0.1:8080"));

        assert_eq!(
            request_origin(&headers, "http://localhost:8080"),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_origin_without_host() {
        assert_eq!(
            request_origin(&HeaderMap::new(), "https://prints.example/"),
            "https://prints.example"
        );
    }

    #[test]
    fn test_checkout_request_shape() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "cart": [{"id": "prod_A"}, {"id": "prod_B", "name": "B", "price": "30.00"}],
            "successUrl": "https://x/ok"
        }))
        .unwrap();

        assert_eq!(request.cart.len(), 2);
        assert_eq!(request.cart[1].id, "prod_B");
        assert_eq!(request.success_url.as_deref(), Some("https://x/ok"));
        assert!(request.cancel_url.is_none());

        assert!(serde_json::from_value::<CheckoutRequest>(serde_json::json!({"cart": "x"})).is_err());
        assert!(serde_json::from_value::<CheckoutRequest>(serde_json::json!({})).is_err());
    }
}
