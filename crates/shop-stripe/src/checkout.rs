//! # Stripe Checkout Sessions
//!
//! Creates hosted Checkout Sessions for a priced cart.
//! Line items reference existing Stripe prices; nothing is priced inline.

use crate::storefront::{parse_body, read_body, StripeStorefront};
use chrono::DateTime;
use serde::Deserialize;
use shop_core::{CheckoutOrder, CheckoutSession, ShopError, ShopResult};
use tracing::{debug, info, instrument};
use uuid::Uuid;

impl StripeStorefront {
    /// Create a checkout session and return its hosted URL
    #[instrument(skip(self, order), fields(items = order.line_items.len()))]
    pub async fn create_session(&self, order: &CheckoutOrder) -> ShopResult<CheckoutSession> {
        let auth = self.config.checkout_auth_header()?;

        if order.is_empty() {
            return Err(ShopError::InvalidRequest(
                "Cart is empty or invalid".to_string(),
            ));
        }

        let form_params = self.session_form(order);
        debug!(
            "Creating Stripe checkout session: {} line items, {} form fields",
            order.line_items.len(),
            form_params.len()
        );

        let response = self
            .client
            .post(self.api_url("/v1/checkout/sessions"))
            .header("Authorization", auth)
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let body = read_body(response, "Failed to create checkout session").await?;
        let session: StripeCheckoutSessionResponse = parse_body(&body)?;

        let url = session.url.ok_or_else(|| {
            ShopError::Serialization("Stripe checkout session has no url".to_string())
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession {
            session_id: session.id,
            url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    /// Form fields for the session request, in a stable order
    fn session_form(&self, order: &CheckoutOrder) -> Vec<(String, String)> {
        let policy = &self.policy;

        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), order.success_url.clone()),
            ("cancel_url".to_string(), order.cancel_url.clone()),
            ("currency".to_string(), policy.currency.as_str().to_string()),
        ];

        if policy.require_billing_address {
            form_params.push((
                "billing_address_collection".to_string(),
                "required".to_string(),
            ));
        }

        for country in &policy.allowed_countries {
            form_params.push((
                "shipping_address_collection[allowed_countries][]".to_string(),
                country.clone(),
            ));
        }

        if policy.collect_phone {
            form_params.push((
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        for (i, item) in order.line_items.iter().enumerate() {
            form_params.push((format!("line_items[{}][price]", i), item.price_id.clone()));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}
