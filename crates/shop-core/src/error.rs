//! # Storefront Error Types
//!
//! Typed error handling for the printshop storefront.
//! All storefront operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("{0}")]
    Configuration(String),

    /// Invalid request data (missing parameters, empty cart)
    #[error("{0}")]
    InvalidRequest(String),

    /// Product has no entry in the static price table
    #[error("Product ID {product_id} not found")]
    ProductNotFound { product_id: String },

    /// Image proxy target is not a provider file-download link
    #[error("Invalid file link")]
    InvalidFileLink,

    /// HTTP method not supported by the endpoint
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Provider answered with a non-2xx status
    #[error("{context}")]
    Upstream {
        context: String,
        status: u16,
        body: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::InvalidRequest(_) => 400,
            ShopError::ProductNotFound { .. } => 400,
            ShopError::InvalidFileLink => 400,
            ShopError::MethodNotAllowed => 405,
            ShopError::Configuration(_) => 500,
            ShopError::Upstream { .. } => 500,
            ShopError::Network(_) => 500,
            ShopError::Serialization(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Message shown to the client in the `error` field.
    ///
    /// Unexpected failures collapse to a generic message; their text goes to
    /// [`ShopError::details`] instead.
    pub fn public_message(&self) -> String {
        match self {
            ShopError::Network(_) | ShopError::Serialization(_) | ShopError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Diagnostic detail forwarded alongside the message, if any
    pub fn details(&self) -> Option<String> {
        match self {
            ShopError::Upstream { body, .. } if !body.is_empty() => Some(body.clone()),
            ShopError::Network(msg) | ShopError::Serialization(msg) | ShopError::Internal(msg) => {
                Some(msg.clone())
            }
            _ => None,
        }
    }

    /// Helper for upstream failures
    pub fn upstream(context: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        ShopError::Upstream {
            context: context.into(),
            status,
            body: body.into(),
        }
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ShopError::InvalidRequest("test".into()).status_code(), 400);
        assert_eq!(
            ShopError::ProductNotFound {
                product_id: "x".into()
            }
            .status_code(),
            400
        );
        assert_eq!(ShopError::InvalidFileLink.status_code(), 400);
        assert_eq!(ShopError::MethodNotAllowed.status_code(), 405);
        assert_eq!(ShopError::Configuration("no key".into()).status_code(), 500);
        assert_eq!(ShopError::upstream("Failed", 402, "{}").status_code(), 500);
    }

    #[test]
    fn test_product_not_found_names_id() {
        let err = ShopError::ProductNotFound {
            product_id: "prod_X".into(),
        };
        assert_eq!(err.public_message(), "Product ID prod_X not found");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_upstream_forwards_body() {
        let err = ShopError::upstream("Failed to fetch products", 401, "{\"error\":\"bad key\"}");
        assert_eq!(err.public_message(), "Failed to fetch products");
        assert_eq!(err.details().as_deref(), Some("{\"error\":\"bad key\"}"));
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err = ShopError::Network("connection reset".into());
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.details().as_deref(), Some("connection reset"));
    }
}
