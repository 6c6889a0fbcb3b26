//! # Catalog Normalization
//!
//! Provider-independent pieces of the catalog listing: the normalized product
//! shape served to the gallery, slug derivation, price formatting, image
//! reference resolution, and the final ordering.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Prefix of provider file identifiers (e.g., `file_abc123`)
pub const FILE_ID_PREFIX: &str = "file_";

/// Path segment that marks a provider file-download link
pub const FILE_LINK_SEGMENT: &str = "/links/";

/// Default path of the image proxy endpoint
pub const DEFAULT_IMAGE_PROXY_PATH: &str = "/api/image";

/// Default base URL for provider-hosted files
pub const DEFAULT_FILES_BASE_URL: &str = "https://files.stripe.com";

/// A product as served to the gallery pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Decimal string with exactly two places (e.g., "70.00")
    pub price: String,
    pub price_id: Option<String>,
    pub currency: String,
    /// Gallery page path, `/<slug>/index.html`
    pub url: String,
    pub image: Option<String>,
    pub images: Vec<String>,
}

/// Derive a URL slug from a display name.
///
/// "Time For Everything" becomes "time-for-everything".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Gallery page path for a product name
pub fn product_url(name: &str) -> String {
    format!("/{}/index.html", slugify(name))
}

/// Format an amount in minor units as a two-place decimal string
pub fn format_minor_units(amount: i64) -> String {
    let amount = amount.max(0);
    format!("{}.{:02}", amount / 100, amount % 100)
}

/// Format a decimal minor-unit string (e.g., `"7000.5"`) as a two-place
/// decimal string. Returns `None` when the value does not parse.
pub fn format_decimal_minor_units(amount: &str) -> Option<String> {
    let value: f64 = amount.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(format_minor_units(value.round() as i64))
}

/// Resolves raw product image references into browser-loadable URLs
#[derive(Debug, Clone)]
pub struct ImageResolver {
    /// Base URL for file content (e.g., "https://files.stripe.com")
    pub files_base_url: String,
    /// Path of this service's image proxy endpoint
    pub proxy_path: String,
}

impl ImageResolver {
    pub fn new(files_base_url: impl Into<String>) -> Self {
        Self {
            files_base_url: files_base_url.into(),
            proxy_path: DEFAULT_IMAGE_PROXY_PATH.to_string(),
        }
    }

    /// Builder: set the proxy endpoint path
    pub fn with_proxy_path(mut self, path: impl Into<String>) -> Self {
        self.proxy_path = path.into();
        self
    }

    /// Resolve one reference.
    ///
    /// Order: file identifier, file-download link, absolute URL. Anything
    /// else resolves to `None`.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        if reference.starts_with(FILE_ID_PREFIX) {
            return Some(format!(
                "{}/v1/files/{}/contents",
                self.files_base_url.trim_end_matches('/'),
                reference
            ));
        }

        if reference.contains(FILE_LINK_SEGMENT) {
            return Some(format!(
                "{}?url={}",
                self.proxy_path,
                urlencoding::encode(reference)
            ));
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Some(reference.to_string());
        }

        None
    }

    /// Resolve every reference, dropping the ones that cannot be displayed
    pub fn resolve_all<'a, I>(&self, references: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        references
            .into_iter()
            .filter_map(|r| self.resolve(r))
            .collect()
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FILES_BASE_URL)
    }
}

/// Compare two display names the way a user expects to see them listed:
/// case-insensitive first, raw text as the tiebreak.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort products by name
pub fn sort_by_name(products: &mut [CatalogProduct]) {
    products.sort_by(|a, b| compare_names(&a.name, &b.name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_price(s: &str) -> bool {
        match s.split_once('.') {
            Some((whole, frac)) => {
                !whole.is_empty()
                    && whole.chars().all(|c| c.is_ascii_digit())
                    && frac.len() == 2
                    && frac.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Time For Everything"), "time-for-everything");
        assert_eq!(slugify("Club Mc Meowly's"), "club-mc-meowly-s");
        assert_eq!(slugify("  A Place To Escape To!! "), "a-place-to-escape-to");
        assert_eq!(slugify("Big Rock Candy Mountain A4"), "big-rock-candy-mountain-a4");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_idempotent() {
        for name in ["Club Mc Meowly's", "Oh Dorothy", "If Only I Was a Giant Dinosaur"] {
            let once = slugify(name);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_product_url() {
        assert_eq!(product_url("Sunrise"), "/sunrise/index.html");
    }

    #[test]
    fn test_format_minor_units() {
        assert_eq!(format_minor_units(7000), "70.00");
        assert_eq!(format_minor_units(100), "1.00");
        assert_eq!(format_minor_units(5), "0.05");
        assert_eq!(format_minor_units(0), "0.00");
        assert_eq!(format_minor_units(-300), "0.00");
        for amount in [0, 1, 99, 100, 12345, 999_999] {
            assert!(is_price(&format_minor_units(amount)));
        }
    }

    #[test]
    fn test_format_decimal_minor_units() {
        assert_eq!(format_decimal_minor_units("7000").as_deref(), Some("70.00"));
        assert_eq!(format_decimal_minor_units("1999.6").as_deref(), Some("20.00"));
        assert!(format_decimal_minor_units("abc").is_none());
    }

    #[test]
    fn test_resolve_file_id() {
        let resolver = ImageResolver::default();
        assert_eq!(
            resolver.resolve("file_abc123").as_deref(),
            Some("https://files.stripe.com/v1/files/file_abc123/contents")
        );
    }

    #[test]
    fn test_resolve_file_link() {
        let resolver = ImageResolver::default();
        let link = "https://files.stripe.com/links/MDB8YWNjdF8x?x=1&y=2";
        assert_eq!(
            resolver.resolve(link).as_deref(),
            Some("/api/image?url=https%3A%2F%2Ffiles.stripe.com%2Flinks%2FMDB8YWNjdF8x%3Fx%3D1%26y%3D2")
        );
    }

    #[test]
    fn test_resolve_absolute_and_unknown() {
        let resolver = ImageResolver::default();
        let url = "https://cdn.example.com/sunrise.jpg";
        assert_eq!(resolver.resolve(url).as_deref(), Some(url));
        assert!(resolver.resolve("sunrise.jpg").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_resolve_all_drops_unresolvable() {
        let resolver = ImageResolver::new("http://127.0.0.1:9000/").with_proxy_path("/img");
        let refs = vec![
            "relative.png".to_string(),
            "file_1".to_string(),
            "https://files.stripe.com/links/abc".to_string(),
        ];
        let resolved = resolver.resolve_all(&refs);
        assert_eq!(
            resolved,
            vec![
                "http://127.0.0.1:9000/v1/files/file_1/contents".to_string(),
                "/img?url=https%3A%2F%2Ffiles.stripe.com%2Flinks%2Fabc".to_string(),
            ]
        );
    }

    #[test]
    fn test_sort_by_name() {
        let make = |name: &str| CatalogProduct {
            id: name.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: "0.00".to_string(),
            price_id: None,
            currency: "eur".to_string(),
            url: product_url(name),
            image: None,
            images: Vec::new(),
        };
        let mut products = vec![make("sunrise"), make("Big Rock"), make("Away"), make("Oh Dorothy")];
        sort_by_name(&mut products);
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Away", "Big Rock", "Oh Dorothy", "sunrise"]);
    }

    #[test]
    fn test_catalog_product_serializes_camel_case() {
        let product = CatalogProduct {
            id: "prod_1".into(),
            name: "Sunrise".into(),
            description: String::new(),
            price: "30.00".into(),
            price_id: Some("price_1".into()),
            currency: "eur".into(),
            url: "/sunrise/index.html".into(),
            image: None,
            images: Vec::new(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["priceId"], "price_1");
        assert!(json["image"].is_null());
    }
}
