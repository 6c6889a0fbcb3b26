//! # shop-wasm
//!
//! WebAssembly cart for the print gallery pages.
//!
//! The cart lives in `window.localStorage` under the `cart` key as a JSON
//! array, one entry per print added. Names, prices and descriptions are copied
//! from the bundled catalog (`config/catalog.toml`).
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { add_item_to_cart, cart_total, checkout_payload } from 'printshop-wasm';
//!
//! await init();
//!
//! add_item_to_cart('prod_THxuZf4QLqQZjx');
//! console.log('Total: €' + cart_total());
//!
//! const res = await fetch('/api/checkout', {
//!   method: 'POST',
//!   headers: { 'Content-Type': 'application/json' },
//!   body: JSON.stringify(checkout_payload()),
//! });
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use serde::Serialize;
use shop_core::{Cart, CartItem, CartRepository, KeyValueStore, ProductCatalog, ShopError, ShopResult};
use std::sync::OnceLock;
use wasm_bindgen::prelude::*;

const BUNDLED_CATALOG: &str = include_str!("../../../config/catalog.toml");

/// Body expected by `POST /api/checkout`
#[derive(Debug, Serialize)]
struct CheckoutPayload<'a> {
    cart: &'a [CartItem],
}

/// `window.localStorage`
struct LocalStorage;

impl LocalStorage {
    fn storage() -> ShopResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| ShopError::Internal("No window available".to_string()))?
            .local_storage()
            .map_err(|e| ShopError::Internal(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| ShopError::Internal("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> ShopResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| ShopError::Internal(format!("Failed to save cart: {:?}", e)))
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| ShopError::Internal(format!("Failed to clear cart: {:?}", e)))
    }
}

fn catalog() -> &'static ProductCatalog {
    static CATALOG: OnceLock<ProductCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| parse_catalog(BUNDLED_CATALOG))
}

fn parse_catalog(source: &str) -> ProductCatalog {
    ProductCatalog::from_toml(source).unwrap_or_else(|e| {
        log(&format!("Bundled catalog is invalid: {}", e));
        ProductCatalog::new()
    })
}

fn repository() -> CartRepository<LocalStorage> {
    CartRepository::new(LocalStorage)
}

fn to_js_error(err: ShopError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_sys::Error::new(&e.to_string()).into())
}

/// Current cart entries
#[wasm_bindgen]
pub fn get_cart() -> Result<JsValue, JsValue> {
    to_js(&repository().load().items)
}

/// Append a print to the cart, returning the new entry count
#[wasm_bindgen]
pub fn add_item_to_cart(product_id: &str) -> Result<usize, JsValue> {
    repository()
        .add(product_id, catalog())
        .map(|cart| cart.len())
        .map_err(to_js_error)
}

/// Remove the entry at `index`, returning the new entry count
#[wasm_bindgen]
pub fn remove_cart_item(index: usize) -> Result<usize, JsValue> {
    repository()
        .remove_at(index)
        .map(|cart| cart.len())
        .map_err(to_js_error)
}

/// Empty the cart
#[wasm_bindgen]
pub fn clear_cart() -> Result<(), JsValue> {
    repository().clear().map_err(to_js_error)
}

/// Number of entries in the cart
#[wasm_bindgen]
pub fn cart_count() -> usize {
    repository().load().len()
}

/// Cart total as a two-decimal string
#[wasm_bindgen]
pub fn cart_total() -> String {
    repository().load().total_display()
}

/// `{cart: [...]}` ready to post to the checkout endpoint
#[wasm_bindgen]
pub fn checkout_payload() -> Result<JsValue, JsValue> {
    let cart: Cart = repository().load();
    to_js(&CheckoutPayload { cart: &cart.items })
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
