//! # Shopping Cart
//!
//! Client-side cart kept in a scoped key-value store (browser localStorage
//! in production, [`MemoryStore`] in tests).
//!
//! The cart is an ordered list with no quantities: adding the same print
//! twice stores two entries. Each entry carries a copy of the catalog name,
//! price and description taken when it was added.

use crate::catalog::format_minor_units;
use crate::error::{ShopError, ShopResult};
use crate::product::ProductCatalog;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

/// Storage key the cart lives under
pub const CART_STORAGE_KEY: &str = "cart";

/// Maximum description length kept on a cart item
pub const MAX_DESCRIPTION_CHARS: usize = 200;

const FALLBACK_NAME: &str = "Print";
const FALLBACK_PRICE: &str = "30.00";

/// An item in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID
    pub id: String,
    /// Product name (denormalized for display)
    #[serde(default)]
    pub name: String,
    /// Display price as a decimal string
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

impl CartItem {
    /// Copy an item out of the static catalog.
    ///
    /// Unknown products still get an entry, priced at the default print rate.
    pub fn from_catalog(product_id: &str, catalog: &ProductCatalog) -> Self {
        match catalog.get(product_id) {
            Some(entry) => Self {
                id: entry.id.clone(),
                name: entry.name.clone(),
                price: entry.price.clone(),
                description: truncate_description(&entry.description),
            },
            None => Self {
                id: product_id.to_string(),
                name: FALLBACK_NAME.to_string(),
                price: FALLBACK_PRICE.to_string(),
                description: String::new(),
            },
        }
    }

    /// Price in minor units, `0` when the stored string does not parse
    pub fn price_minor_units(&self) -> i64 {
        parse_decimal_price(&self.price).unwrap_or(0)
    }
}

/// Ordered cart contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove the entry at `index`, if present
    pub fn remove_at(&mut self, index: usize) -> Option<CartItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total in minor units
    pub fn total_minor_units(&self) -> i64 {
        self.items.iter().map(CartItem::price_minor_units).sum()
    }

    /// Total formatted as a two-place decimal string
    pub fn total_display(&self) -> String {
        format_minor_units(self.total_minor_units())
    }
}

/// Scoped key-value storage the cart is persisted in.
///
/// Browser storage is single-threaded, so implementations are not required
/// to be `Send` or `Sync`.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> ShopResult<()>;

    fn remove(&self, key: &str) -> ShopResult<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> ShopResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ShopResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Cart persistence over a [`KeyValueStore`].
///
/// Every mutation reads the stored list, changes it and writes it back.
pub struct CartRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CartRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the cart. Missing or unreadable data yields an empty cart.
    pub fn load(&self) -> Cart {
        self.store
            .read(CART_STORAGE_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, cart: &Cart) -> ShopResult<()> {
        let json = serde_json::to_string(cart)
            .map_err(|e| ShopError::Serialization(format!("Failed to encode cart: {}", e)))?;
        self.store.write(CART_STORAGE_KEY, &json)
    }

    /// Append a product copied from the catalog and persist the cart
    pub fn add(&self, product_id: &str, catalog: &ProductCatalog) -> ShopResult<Cart> {
        let mut cart = self.load();
        cart.push(CartItem::from_catalog(product_id, catalog));
        self.save(&cart)?;
        Ok(cart)
    }

    /// Remove the entry at `index` and persist the cart
    pub fn remove_at(&self, index: usize) -> ShopResult<Cart> {
        let mut cart = self.load();
        cart.remove_at(index);
        self.save(&cart)?;
        Ok(cart)
    }

    pub fn clear(&self) -> ShopResult<()> {
        self.store.remove(CART_STORAGE_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Cut a description to at most 200 characters, ending in `...` when cut
pub fn truncate_description(desc: &str) -> String {
    if desc.chars().count() <= MAX_DESCRIPTION_CHARS {
        return desc.to_string();
    }
    let mut cut: String = desc.chars().take(MAX_DESCRIPTION_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

/// Parse a decimal price string ("70.00", "1.5", "30") into minor units
pub fn parse_decimal_price(price: &str) -> Option<i64> {
    let price = price.trim();
    let (whole, frac) = match price.split_once('.') {
        Some((w, f)) => (w, f),
        None => (price, ""),
    };
    if whole.is_empty() || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    if whole < 0 {
        return None;
    }
    Some(whole * 100 + frac)
}
