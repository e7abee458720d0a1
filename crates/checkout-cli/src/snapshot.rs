//! # Checkout Snapshot
//!
//! The cart state the headless driver starts from, loaded from TOML.

use checkout_core::{AddressFields, ShippingMethod};
use serde::Deserialize;

/// Cart and checkout state before the Amazon Pay flow runs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSnapshot {
    /// Cart (quote) id
    #[serde(default)]
    pub cart_id: Option<String>,

    /// Code of the payment method already on the cart
    #[serde(default)]
    pub selected_payment_method: Option<String>,

    #[serde(default)]
    pub shipping_method: Option<ShippingMethod>,

    /// Billing address already on the cart, if any
    #[serde(default)]
    pub billing_address: Option<AddressFields>,

    #[serde(default)]
    pub agreements: AgreementsSnapshot,
}

/// Terms and conditions state
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AgreementsSnapshot {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub accepted: bool,
}

/// Load the snapshot from `CHECKOUT_SNAPSHOT` or `config/checkout.toml`
pub fn load_snapshot() -> anyhow::Result<CheckoutSnapshot> {
    let explicit = std::env::var("CHECKOUT_SNAPSHOT").ok();
    let config_paths = [
        "config/checkout.toml",
        "../config/checkout.toml",
        "../../config/checkout.toml",
    ];

    let candidates = explicit.iter().map(String::as_str).chain(config_paths);

    for path in candidates {
        if let Ok(content) = std::fs::read_to_string(path) {
            let snapshot: CheckoutSnapshot = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded checkout snapshot from {}", path);
            return Ok(snapshot);
        }
    }

    if let Some(path) = explicit {
        anyhow::bail!("Checkout snapshot not found: {}", path);
    }

    tracing::warn!("No checkout snapshot found, starting from an empty cart");
    Ok(CheckoutSnapshot::default())
}

/// Accept a full return URL or a bare query string and return the query.
pub fn page_query(input: &str) -> &str {
    match input.split_once('?') {
        Some((_, query)) => query.split('#').next().unwrap_or(query),
        None => input,
    }
}
