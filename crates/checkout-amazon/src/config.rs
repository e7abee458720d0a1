//! # Amazon Pay Configuration
//!
//! Where the storefront backend lives and how the payment method is wired.
//! Values are loaded from environment variables.

use checkout_core::CheckoutError;
use std::env;
use std::time::Duration;

/// Payment method code the backend registers for Amazon Pay v2
pub const DEFAULT_METHOD_CODE: &str = "amazon_payment_v2";

/// Vendor SDK served for the EU region
pub const DEFAULT_SCRIPT_URL: &str = "https://static-eu.payments-amazon.com/checkout.js";

/// Amazon Pay integration configuration
#[derive(Debug, Clone)]
pub struct AmazonPayConfig {
    /// Storefront origin (https://shop.example.com)
    pub base_url: String,

    /// Store-scoped REST prefix (/rest/default, /rest/de_storeview)
    pub rest_prefix: String,

    /// Payment method code this integration answers to
    pub method_code: String,

    /// Vendor SDK script URL
    pub script_url: String,

    /// HTTP timeout for backend calls
    pub timeout: Duration,
}

impl AmazonPayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STOREFRONT_BASE_URL`
    ///
    /// Optional: `STOREFRONT_REST_PREFIX`, `AMAZON_PAY_METHOD_CODE`,
    /// `AMAZON_PAY_SCRIPT_URL`, `AMAZON_PAY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("STOREFRONT_BASE_URL").map_err(|_| {
            CheckoutError::Configuration("STOREFRONT_BASE_URL not set".to_string())
        })?;

        let timeout_secs = match env::var("AMAZON_PAY_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "AMAZON_PAY_TIMEOUT_SECS must be a number of seconds, got {raw}"
                ))
            })?,
            Err(_) => 30,
        };

        let mut config = Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs));

        if let Ok(prefix) = env::var("STOREFRONT_REST_PREFIX") {
            config = config.with_rest_prefix(prefix);
        }
        if let Ok(code) = env::var("AMAZON_PAY_METHOD_CODE") {
            config.method_code = code;
        }
        if let Ok(url) = env::var("AMAZON_PAY_SCRIPT_URL") {
            config.script_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rest_prefix: "/rest/default".to_string(),
            method_code: DEFAULT_METHOD_CODE.to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Check the base URL is an http(s) origin
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CheckoutError::Configuration(
                "STOREFRONT_BASE_URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder: set the store-scoped REST prefix
    pub fn with_rest_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.rest_prefix = format!("/{}", prefix.trim_matches('/'));
        self
    }

    /// Builder: set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Root of the checkout-session endpoints
    pub fn endpoint_root(&self) -> String {
        format!("{}{}/V1/amazon-checkout-session", self.base_url, self.rest_prefix)
    }
}
