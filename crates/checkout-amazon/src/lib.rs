//! # checkout-amazon
//!
//! Amazon Pay checkout-session flow for the storefront checkout.
//!
//! This crate provides:
//!
//! 1. **AmazonCheckoutClient** - reqwest client for the storefront's
//!    `/V1/amazon-checkout-session` endpoints
//! 2. **AmazonPayFlow** - session config fetch, one-shot address sync and
//!    order placement, sequenced against checkout events
//! 3. **AmazonPayMethod** - the payment method row the checkout UI drives
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_amazon::{AmazonCheckoutClient, AmazonPayFlow, AmazonPayMethod};
//! use checkout_core::{PaymentActions, PaymentMethod};
//!
//! let client = AmazonCheckoutClient::from_env()?;
//! let config = client.config().clone();
//! let flow = AmazonPayFlow::new(&config, Arc::new(client), context, location_search);
//!
//! let actions = Arc::new(PaymentActions::new());
//! let row = AmazonPayMethod::new(
//!     PaymentMethod::new("amazon_payment_v2", "Amazon Pay"),
//!     Arc::new(flow),
//!     actions.clone(),
//! );
//!
//! row.on_mount()?;
//! row.on_select().await?;
//! row.on_process_payment_enabled().await;
//!
//! // Checkout form submit:
//! let outcome = actions.submit("amazon_payment_v2").await;
//! ```

pub mod client;
pub mod config;
pub mod flow;
pub mod method;
pub mod place_order;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use client::AmazonCheckoutClient;
pub use config::{AmazonPayConfig, DEFAULT_METHOD_CODE, DEFAULT_SCRIPT_URL};
pub use flow::{AddressSync, AmazonPayFlow};
pub use method::{AmazonPayMethod, MethodView, RadioInput};
pub use place_order::OrderPlacement;
