//! # Stripe File Links
//!
//! Fetches the bytes behind a Stripe file-download link so the gallery can
//! embed it as an ordinary image. Only links on the configured files origin
//! under `/links/` are fetched.

use crate::storefront::StripeStorefront;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use shop_core::catalog::FILE_LINK_SEGMENT;
use shop_core::{ProxiedImage, ShopError, ShopResult, DEFAULT_IMAGE_CONTENT_TYPE};
use tracing::{debug, error, instrument};

const PROXY_USER_AGENT: &str = "Mozilla/5.0";

impl StripeStorefront {
    /// Check that `link` is a file-download link on the files origin
    pub fn is_file_link(&self, link: &str) -> bool {
        let (Ok(target), Ok(files)) = (Url::parse(link), Url::parse(&self.config.files_base_url))
        else {
            return false;
        };

        target.origin() == files.origin() && target.path().starts_with(FILE_LINK_SEGMENT)
    }

    /// Fetch a file link, following redirects
    #[instrument(skip(self))]
    pub async fn fetch_file_link(&self, link: &str) -> ShopResult<ProxiedImage> {
        if !self.is_file_link(link) {
            return Err(ShopError::InvalidFileLink);
        }

        let response = self
            .client
            .get(link)
            .header("User-Agent", PROXY_USER_AGENT)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!("File link fetch failed: status={}", status);
            return Err(ShopError::upstream(
                "Failed to fetch image",
                status.as_u16(),
                String::new(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE)
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?
            .to_vec();

        debug!("Proxied {} bytes of {}", body.len(), content_type);

        Ok(ProxiedImage { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripeConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn storefront(files_base_url: &str) -> StripeStorefront {
        StripeStorefront::new(StripeConfig::new().with_files_base_url(files_base_url)).unwrap()
    }

    #[test]
    fn test_is_file_link() {
        let storefront = storefront("https://files.stripe.com");

        assert!(storefront.is_file_link("https://files.stripe.com/links/MDB8YWNj"));
        assert!(!storefront.is_file_link("https://files.stripe.com/v1/files/file_1/contents"));
        assert!(!storefront.is_file_link("https://evil.example.com/links/abc"));
        assert!(!storefront.is_file_link("https://evil.example.com/?u=files.stripe.com/links/abc"));
        assert!(!storefront.is_file_link("http://files.stripe.com/links/abc"));
        assert!(!storefront.is_file_link("not a url"));
    }

    #[tokio::test]
    async fn test_rejects_before_fetching() {
        let server = MockServer::start().await;
        let storefront = storefront(&server.uri());

        let err = storefront
            .fetch_file_link(&format!("{}/images/cat.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::InvalidFileLink));
        assert_eq!(err.status_code(), 400);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetches_with_upstream_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/links/abc"))
            .and(header("User-Agent", "Mozilla/5.0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"),
            )
            .mount(&server)
            .await;

        let image = storefront(&server.uri())
            .fetch_file_link(&format!("{}/links/abc", server.uri()))
            .await
            .unwrap();

        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.body, vec![0x89, 0x50, 0x4e, 0x47]);
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/links/moved"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/links/final", server.uri()).as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/links/final"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
            .mount(&server)
            .await;

        let image = storefront(&server.uri())
            .fetch_file_link(&format!("{}/links/moved", server.uri()))
            .await
            .unwrap();

        assert_eq!(image.body, b"jpeg".to_vec());
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/links/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = storefront(&server.uri())
            .fetch_file_link(&format!("{}/links/gone", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "Failed to fetch image");
    }
}
