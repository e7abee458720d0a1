//! # Checkout Session REST Client
//!
//! reqwest implementation of `CheckoutSessionApi` against the storefront's
//! `/V1/amazon-checkout-session` endpoints.

use crate::config::AmazonPayConfig;
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, CheckoutSessionApi, CheckoutSessionId, ProviderAddress,
    SessionConfig,
};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// HTTP client for the storefront's checkout-session endpoints
pub struct AmazonCheckoutClient {
    config: AmazonPayConfig,
    client: Client,
}

impl AmazonCheckoutClient {
    /// Create a new client
    pub fn new(config: AmazonPayConfig) -> CheckoutResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(AmazonPayConfig::from_env()?)
    }

    pub fn config(&self) -> &AmazonPayConfig {
        &self.config
    }

    /// Build an endpoint URL, encoding each segment on its own.
    fn endpoint(&self, segments: &[&str]) -> CheckoutResult<Url> {
        let root = self.config.endpoint_root();
        let mut url = Url::parse(&root)
            .map_err(|e| CheckoutError::Configuration(format!("Invalid endpoint {root}: {e}")))?;

        url.path_segments_mut()
            .map_err(|_| CheckoutError::Configuration(format!("Invalid endpoint {root}")))?
            .extend(segments);

        Ok(url)
    }

    async fn get_json(&self, url: Url) -> CheckoutResult<Value> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        read_json(response).await
    }

    async fn addresses(
        &self,
        session_id: &CheckoutSessionId,
        kind: &str,
    ) -> CheckoutResult<Vec<ProviderAddress>> {
        let url = self.endpoint(&[session_id.as_str(), kind])?;
        let addresses = address_list(self.get_json(url).await?)?;

        debug!("Fetched {} {} record(s)", addresses.len(), kind);
        Ok(addresses)
    }
}

#[async_trait]
impl CheckoutSessionApi for AmazonCheckoutClient {
    #[instrument(skip(self))]
    async fn session_config(&self) -> CheckoutResult<Option<SessionConfig>> {
        let url = self.endpoint(&["config"])?;
        let config = SessionConfig::from_response(self.get_json(url).await?)?;

        if config.is_none() {
            info!("Backend returned no checkout session config");
        }
        Ok(config)
    }

    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    async fn shipping_addresses(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Vec<ProviderAddress>> {
        self.addresses(session_id, "shipping-address").await
    }

    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    async fn billing_addresses(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Vec<ProviderAddress>> {
        self.addresses(session_id, "billing-address").await
    }

    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    async fn update_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Option<String>> {
        let url = self.endpoint(&[session_id.as_str(), "update"])?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        match read_json(response).await? {
            Value::String(redirect) => {
                info!("Checkout session updated, redirect={}", redirect);
                Ok(Some(redirect))
            }
            other => {
                info!("Checkout session updated without redirect: {}", other);
                Ok(None)
            }
        }
    }
}

/// Check the status and parse the body. An empty body reads as `null`.
async fn read_json(response: Response) -> CheckoutResult<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CheckoutError::Network(e.to_string()))?;

    if !status.is_success() {
        error!("Storefront API error: status={}, body={}", status, body);

        // Magento REST errors carry a top-level "message"
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or(body);

        return Err(CheckoutError::Provider {
            status: status.as_u16(),
            message,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        CheckoutError::Serialization(format!("Failed to parse storefront response: {e}"))
    })
}

fn address_list(value: Value) -> CheckoutResult<Vec<ProviderAddress>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(CheckoutError::from))
            .collect(),
        record => Ok(vec![serde_json::from_value(record)?]),
    }
}
