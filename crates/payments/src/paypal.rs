//! Wallet order lookups

use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde::Deserialize;

use crate::{PaymentError, PaypalConfig, WalletGateway, WalletStatus};

#[derive(Debug, Clone)]
pub struct PaypalClient {
    config: PaypalConfig,
    http: Client,
}

impl PaypalClient {
    #[must_use]
    pub fn new(config: PaypalConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Exchanges the client credentials for a short-lived bearer token
    async fn access_token(&self) -> Result<String, PaymentError> {
        let response = self
            .http
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.secret_id))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("Wallet token request failed with status {status}");

            return Err(PaymentError::Gateway(format!(
                "token request failed with status {status}: {text}"
            )));
        }

        let parsed: TokenResponse = response.json().await?;

        Ok(parsed.access_token)
    }
}

#[async_trait]
impl WalletGateway for PaypalClient {
    async fn order_status(&self, order_id: &str) -> Result<WalletStatus, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.url(&format!("/v2/checkout/orders/{order_id}")))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("Wallet order lookup for {order_id} failed with status {status}");

            return Err(PaymentError::Gateway(format!(
                "order lookup failed with status {status}: {text}"
            )));
        }

        let parsed: OrderResponse = response.json().await?;

        Ok(WalletStatus(parsed.status))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    status: String,
}
