//! # Payment Actions
//!
//! A payment method row registers the action the checkout form runs when the
//! shopper submits the order. The form looks the action up by method code.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Why an order placement was skipped before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingSession,
    NoShippingMethod,
    NoBillingAddress,
    AgreementsNotAccepted,
}

/// Result of one order submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PlaceOrderOutcome {
    /// Backend returned a URL and the browser was sent there
    Redirected(String),
    /// Backend accepted the update without a redirect target
    Completed,
    /// Preconditions not met, nothing sent
    Skipped(SkipReason),
    /// The finalize request failed; the shopper has been told
    Failed,
}

impl PlaceOrderOutcome {
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            PlaceOrderOutcome::Redirected(url) => Some(url),
            _ => None,
        }
    }

    /// The backend accepted the order, with or without a redirect
    pub fn is_placed(&self) -> bool {
        matches!(self, PlaceOrderOutcome::Redirected(_) | PlaceOrderOutcome::Completed)
    }
}

/// Handler the checkout form invokes on submit
#[async_trait]
pub trait PaymentAction: Send + Sync {
    async fn place_order(&self) -> PlaceOrderOutcome;
}

/// Type alias for a shared payment action
pub type BoxedPaymentAction = Arc<dyn PaymentAction>;

/// Where payment method rows register their submit handlers
pub trait PaymentActionRegistry: Send + Sync {
    fn register_payment_action(&self, method_code: &str, action: BoxedPaymentAction);
}

/// In-process registry keyed by payment method code
#[derive(Default)]
pub struct PaymentActions {
    actions: RwLock<HashMap<String, BoxedPaymentAction>>,
}

impl PaymentActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action registered for a method
    pub fn get(&self, method_code: &str) -> Option<BoxedPaymentAction> {
        self.actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(method_code)
            .cloned()
    }

    /// Check if a method has registered an action
    pub fn has_action(&self, method_code: &str) -> bool {
        self.get(method_code).is_some()
    }

    /// Run the submit handler for the selected method.
    ///
    /// Returns `None` when the method never registered one.
    pub async fn submit(&self, method_code: &str) -> Option<PlaceOrderOutcome> {
        let action = self.get(method_code)?;
        Some(action.place_order().await)
    }
}

impl PaymentActionRegistry for PaymentActions {
    fn register_payment_action(&self, method_code: &str, action: BoxedPaymentAction) {
        self.actions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method_code.to_string(), action);
    }
}
