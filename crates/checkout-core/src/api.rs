//! # Checkout Session API
//!
//! The storefront backend endpoints the integration consumes. The wire
//! format belongs to the backend; implementations only issue the request and
//! parse the JSON.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 CheckoutSessionApi (trait)                   │
//! │  ├── session_config()     GET  .../config                    │
//! │  ├── shipping_addresses() GET  .../{id}/shipping-address     │
//! │  ├── billing_addresses()  GET  .../{id}/billing-address      │
//! │  └── update_session()     POST .../{id}/update               │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::address::ProviderAddress;
use crate::error::CheckoutResult;
use crate::session::{CheckoutSessionId, SessionConfig};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait CheckoutSessionApi: Send + Sync {
    /// Fetch the button configuration. `None` when the backend has none.
    async fn session_config(&self) -> CheckoutResult<Option<SessionConfig>>;

    /// Shipping addresses the shopper picked in the provider flow.
    async fn shipping_addresses(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Vec<ProviderAddress>>;

    /// Billing addresses attached to the provider session.
    async fn billing_addresses(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Vec<ProviderAddress>>;

    /// Finalize the session. Returns the URL the browser should go to next,
    /// if the backend sent one.
    async fn update_session(&self, session_id: &CheckoutSessionId)
        -> CheckoutResult<Option<String>>;
}

/// Type alias for a shared API client (dynamic dispatch)
pub type BoxedCheckoutSessionApi = Arc<dyn CheckoutSessionApi>;
