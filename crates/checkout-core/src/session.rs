//! # Checkout Session Types
//!
//! The session identifier the provider appends to the return URL, the
//! backend-issued session configuration, and the options object passed to
//! the vendor's button render call.

use crate::error::CheckoutResult;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Query parameter carrying the provider's checkout session id
pub const SESSION_QUERY_PARAM: &str = "amazonCheckoutSessionId";

/// Element the vendor button is rendered into
pub const BUTTON_CONTAINER: &str = "#AmazonPayButton";

/// Opaque checkout session identifier issued by the payment provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutSessionId(String);

impl CheckoutSessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Extract the session id from a page query string.
    ///
    /// Accepts the query with or without its leading `?`. Returns `None`
    /// when the parameter is absent or empty.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);

        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == SESSION_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckoutSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session configuration issued by the storefront backend
///
/// Passed opaquely to the vendor widget. Keys are accepted in snake_case
/// (Magento REST) and camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default, alias = "merchantId")]
    pub merchant_id: String,
    #[serde(default, alias = "publicKeyId")]
    pub public_key_id: String,
    #[serde(default, alias = "ledgerCurrency")]
    pub ledger_currency: String,
    #[serde(default, alias = "checkoutLanguage")]
    pub checkout_language: String,
    #[serde(default, alias = "buttonColor")]
    pub button_color: Option<String>,
    #[serde(default, alias = "checkoutReviewPayload")]
    pub checkout_review_payload: String,
    #[serde(default, alias = "checkoutReviewSignature")]
    pub checkout_review_signature: String,
    #[serde(default, deserialize_with = "flag")]
    pub sandbox: bool,
}

impl SessionConfig {
    /// Interpret a config endpoint response.
    ///
    /// `null`, an empty array, or a config without a merchant id means the
    /// backend has no config to offer. A one-element array is unwrapped.
    pub fn from_response(value: serde_json::Value) -> CheckoutResult<Option<Self>> {
        let value = match value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::Array(items) => match items.into_iter().next() {
                Some(first) => first,
                None => return Ok(None),
            },
            other => other,
        };

        let config: SessionConfig = serde_json::from_value(value)?;
        if config.merchant_id.is_empty() {
            return Ok(None);
        }
        Ok(Some(config))
    }
}

/// Magento serializes booleans from config as `true`, `1` or `"1"`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        Some(Flag::Text(s)) => matches!(s.as_str(), "1" | "true"),
        None => false,
    })
}

/// Signed checkout review payload for the vendor's create-session call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCheckoutSessionConfig {
    #[serde(rename = "payloadJSON")]
    pub payload_json: String,
    pub signature: String,
}

/// Options object for `amazon.Pay.renderButton`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonOptions {
    pub merchant_id: String,
    pub public_key_id: String,
    pub ledger_currency: String,
    pub checkout_language: String,
    pub product_type: &'static str,
    pub placement: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    pub create_checkout_session_config: CreateCheckoutSessionConfig,
    pub sandbox: bool,
}

impl From<&SessionConfig> for ButtonOptions {
    fn from(config: &SessionConfig) -> Self {
        Self {
            merchant_id: config.merchant_id.clone(),
            public_key_id: config.public_key_id.clone(),
            ledger_currency: config.ledger_currency.clone(),
            checkout_language: config.checkout_language.clone(),
            product_type: "PayAndShip",
            placement: "Checkout",
            button_color: config.button_color.clone(),
            create_checkout_session_config: CreateCheckoutSessionConfig {
                payload_json: config.checkout_review_payload.clone(),
                signature: config.checkout_review_signature.clone(),
            },
            sandbox: config.sandbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("?amazonCheckoutSessionId=abc-123", Some("abc-123"))]
    #[case("amazonCheckoutSessionId=abc-123&foo=bar", Some("abc-123"))]
    #[case("?foo=bar&amazonCheckoutSessionId=a%2Fb", Some("a/b"))]
    #[case("?amazonCheckoutSessionId=first&amazonCheckoutSessionId=second", Some("first"))]
    #[case("?amazonCheckoutSessionId=", None)]
    #[case("?foo=bar", None)]
    #[case("", None)]
    fn test_session_id_from_query(#[case] query: &str, #[case] expected: Option<&str>) {
        let id = CheckoutSessionId::from_query(query);
        assert_eq!(id.as_ref().map(CheckoutSessionId::as_str), expected);
    }

    #[test]
    fn test_config_from_snake_case_array() {
        let config = SessionConfig::from_response(json!([{
            "merchant_id": "M1",
            "public_key_id": "PK",
            "ledger_currency": "EUR",
            "checkout_language": "de_DE",
            "checkout_review_payload": "{}",
            "checkout_review_signature": "sig",
            "sandbox": "1"
        }]))
        .unwrap()
        .unwrap();

        assert_eq!(config.merchant_id, "M1");
        assert_eq!(config.ledger_currency, "EUR");
        assert!(config.sandbox);
    }

    #[test]
    fn test_config_missing() {
        assert!(SessionConfig::from_response(json!(null)).unwrap().is_none());
        assert!(SessionConfig::from_response(json!([])).unwrap().is_none());
        assert!(SessionConfig::from_response(json!({ "sandbox": true }))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_button_options_shape() {
        let config = SessionConfig {
            merchant_id: "M1".into(),
            public_key_id: "PK".into(),
            ledger_currency: "EUR".into(),
            checkout_language: "de_DE".into(),
            button_color: Some("Gold".into()),
            checkout_review_payload: "{\"a\":1}".into(),
            checkout_review_signature: "sig".into(),
            sandbox: false,
        };

        let options = serde_json::to_value(ButtonOptions::from(&config)).unwrap();

        assert_eq!(options["merchantId"], "M1");
        assert_eq!(options["productType"], "PayAndShip");
        assert_eq!(options["placement"], "Checkout");
        assert_eq!(options["buttonColor"], "Gold");
        assert_eq!(
            options["createCheckoutSessionConfig"],
            json!({ "payloadJSON": "{\"a\":1}", "signature": "sig" })
        );
        assert_eq!(options["sandbox"], false);
    }
}
