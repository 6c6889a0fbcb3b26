//! # Product Types
//!
//! Static product catalog for the printshop.
//! Entries are loaded from `config/catalog.toml` and are read-only afterwards.
//! The catalog doubles as the product → price identifier table used at
//! checkout and as the product map the browser cart copies from.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217).
///
/// Only two-decimal currencies: amounts are kept in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            "chf" => Ok(Currency::CHF),
            "mxn" => Ok(Currency::MXN),
            other => Err(format!("unsupported currency: {}", other)),
        }
    }
}

/// A product in the static catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Provider product identifier (e.g., "prod_THxs9v5Opt7nLE")
    pub id: String,

    /// Provider price identifier charged at checkout
    pub price_id: String,

    /// Display name
    pub name: String,

    /// Display price as a decimal string (e.g., "70.00")
    pub price: String,

    /// Short description
    #[serde(default)]
    pub description: String,
}

impl CatalogEntry {
    /// Create a new catalog entry
    pub fn new(
        id: impl Into<String>,
        price_id: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            price_id: price_id.into(),
            name: name.into(),
            price: price.into(),
            description: String::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<CatalogEntry>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add an entry to the catalog
    pub fn add(&mut self, entry: CatalogEntry) {
        self.products.push(entry);
    }

    /// Builder: add an entry
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.add(entry);
        self
    }

    /// Find an entry by product ID
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up the price identifier for a product
    pub fn price_id_for(&self, product_id: &str) -> Option<&str> {
        self.get(product_id).map(|p| p.price_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("eur".parse::<Currency>(), Ok(Currency::EUR));
        assert_eq!(" GBP ".parse::<Currency>(), Ok(Currency::GBP));
        assert!("xyz".parse::<Currency>().is_err());
        assert!("jpy".parse::<Currency>().is_err());
        assert_eq!(Currency::default().as_str(), "eur");
        assert_eq!(Currency::EUR.to_string(), "EUR");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ProductCatalog::new()
            .with_entry(CatalogEntry::new("prod_a", "price_a", "Sunrise", "30.00"))
            .with_entry(
                CatalogEntry::new("prod_b", "price_b", "The Entity", "70.00")
                    .with_description("The Entity A4"),
            );

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.price_id_for("prod_b"), Some("price_b"));
        assert_eq!(catalog.get("prod_b").unwrap().description, "The Entity A4");
        assert!(catalog.price_id_for("prod_missing").is_none());
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml_str = r#"
            [[products]]
            id = "prod_THxs9v5Opt7nLE"
            price_id = "price_1SZf53JzbynpJBQqWdug6P97"
            name = "Sunrise"
            price = "30.00"

            [[products]]
            id = "prod_THxtUYehCZREGs"
            price_id = "price_1SLNy5JzbynpJBQqiLd3QalZ"
            name = "The Entity"
            price = "70.00"
            description = "The Entity A4"
        "#;

        let catalog = ProductCatalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products[0].description, "");
        assert_eq!(
            catalog.price_id_for("prod_THxtUYehCZREGs"),
            Some("price_1SLNy5JzbynpJBQqiLd3QalZ")
        );
    }
}
