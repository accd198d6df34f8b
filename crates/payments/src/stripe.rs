//! Hosted checkout sessions on the card processor

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::{
    CardGateway, CardPaymentStatus, CheckoutRequest, CheckoutSession, PaymentError, SessionState,
    StripeConfig,
};

#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    http: Client,
}

impl StripeClient {
    #[must_use]
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }
}

/// Form fields for a single-line, card-only payment session
fn session_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("mode", "payment".to_string()),
        ("payment_method_types[0]", "card".to_string()),
        ("client_reference_id", request.order_oid.clone()),
        ("metadata[order_oid]", request.order_oid.clone()),
        (
            "line_items[0][price_data][currency]",
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            request.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            request.amount.to_string(),
        ),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
    ];

    if let Some(email) = &request.customer_email {
        form.push(("customer_email", email.clone()));
    }

    form
}

async fn ensure_success(response: Response, action: &str) -> Result<Response, PaymentError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    warn!("Card processor {action} failed with status {status}");

    Err(PaymentError::Gateway(format!(
        "{action} failed with status {status}: {text}"
    )))
}

#[async_trait]
impl CardGateway for StripeClient {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .http
            .post(self.url("/v1/checkout/sessions"))
            .bearer_auth(&self.config.secret_key)
            .form(&session_form(request))
            .send()
            .await?;

        let parsed: SessionResponse = ensure_success(response, "create session")
            .await?
            .json()
            .await?;
        debug!(
            "Opened checkout session {} for order {}",
            parsed.id, request.order_oid
        );

        Ok(CheckoutSession {
            id: parsed.id,
            url: parsed.url,
        })
    }

    async fn session_status(&self, session_id: &str) -> Result<SessionState, PaymentError> {
        let response = self
            .http
            .get(self.url(&format!("/v1/checkout/sessions/{session_id}")))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        let parsed: SessionResponse = ensure_success(response, "retrieve session")
            .await?
            .json()
            .await?;

        Ok(SessionState {
            status: CardPaymentStatus::from_session(
                &parsed.payment_status,
                parsed.status.as_deref(),
            ),
            client_reference_id: parsed.client_reference_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
    payment_status: String,
    status: Option<String>,
    client_reference_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_form() {
        let request = CheckoutRequest {
            order_oid: "DABC123".to_string(),
            customer_email: Some("ada@example.com".to_string()),
            description: "Order DABC123 for Ada".to_string(),
            amount: 14300,
            currency: "usd".to_string(),
            success_url: "https://site/payment-success/DABC123".to_string(),
            cancel_url: "https://site/payment-failed/DABC123".to_string(),
        };

        let form = session_form(&request);
        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str())
        };

        assert_eq!(field("line_items[0][price_data][unit_amount]"), Some("14300"));
        assert_eq!(field("line_items[0][quantity]"), Some("1"));
        assert_eq!(field("payment_method_types[0]"), Some("card"));
        assert_eq!(field("customer_email"), Some("ada@example.com"));
        assert_eq!(field("metadata[order_oid]"), Some("DABC123"));
    }

    #[test]
    fn test_session_form_without_email() {
        let request = CheckoutRequest {
            order_oid: "DXYZ".to_string(),
            customer_email: None,
            description: "Order DXYZ".to_string(),
            amount: 0,
            currency: "usd".to_string(),
            success_url: String::new(),
            cancel_url: String::new(),
        };

        assert!(
            session_form(&request)
                .iter()
                .all(|(key, _)| *key != "customer_email")
        );
    }
}
