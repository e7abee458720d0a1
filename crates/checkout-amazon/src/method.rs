//! # Amazon Pay Method Row
//!
//! The radio-option row that represents Amazon Pay among the checkout's
//! payment methods. The hosting UI calls the `on_*` handlers at the matching
//! lifecycle points and renders `view()`.

use crate::flow::{AddressSync, AmazonPayFlow};
use checkout_core::{
    BoxedPaymentAction, CheckoutResult, PaymentActionRegistry, PaymentMethod, BUTTON_CONTAINER,
    PAYMENT_NOT_AVAILABLE,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Radio input for one payment method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioInput {
    pub name: &'static str,
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// What the row renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodView {
    pub radio: RadioInput,
    /// Element id the vendor button mounts into, only while selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_container: Option<&'static str>,
}

pub struct AmazonPayMethod {
    method: PaymentMethod,
    flow: Arc<AmazonPayFlow>,
    registry: Arc<dyn PaymentActionRegistry>,
}

impl AmazonPayMethod {
    pub fn new(
        method: PaymentMethod,
        flow: Arc<AmazonPayFlow>,
        registry: Arc<dyn PaymentActionRegistry>,
    ) -> Self {
        Self {
            method,
            flow,
            registry,
        }
    }

    pub fn method(&self) -> &PaymentMethod {
        &self.method
    }

    pub fn flow(&self) -> &Arc<AmazonPayFlow> {
        &self.flow
    }

    pub fn is_selected(&self, selected: &PaymentMethod) -> bool {
        self.method.code == selected.code
    }

    pub fn view(&self, selected: &PaymentMethod) -> MethodView {
        let checked = self.is_selected(selected);

        MethodView {
            radio: RadioInput {
                name: "paymentMethod",
                value: self.method.code.clone(),
                label: self.method.title.clone(),
                checked,
            },
            button_container: checked.then(|| BUTTON_CONTAINER.trim_start_matches('#')),
        }
    }

    /// Row mounted: make sure the vendor SDK is on the page.
    pub fn on_mount(&self) -> CheckoutResult<()> {
        self.flow.ensure_sdk_loaded()
    }

    /// Row selected: render the vendor button and make this the cart's
    /// payment method if it is not already.
    ///
    /// Failures are shown to the shopper and returned.
    #[instrument(skip(self), fields(method = %self.method.code))]
    pub async fn on_select(&self) -> CheckoutResult<()> {
        let app = &self.flow.context().app;
        app.set_page_loader(true);

        let result = self.initialize_on_selection().await;
        if let Err(e) = &result {
            warn!("Could not initialize payment method: {}", e);
            app.set_error_message(PAYMENT_NOT_AVAILABLE);
        }

        app.set_page_loader(false);
        result
    }

    async fn initialize_on_selection(&self) -> CheckoutResult<()> {
        self.flow.get_checkout_session_config().await?;

        let cart = &self.flow.context().cart;
        if cart.selected_payment_method().as_deref() != Some(self.method.code.as_str()) {
            cart.set_payment_method(&self.method.code).await?;
        }
        Ok(())
    }

    /// Process-payment trigger: once enabled, sync the provider addresses and
    /// register the order placement as this method's submit handler.
    ///
    /// Returns `None` while processing is not enabled.
    #[instrument(skip(self), fields(method = %self.method.code))]
    pub async fn on_process_payment_enabled(&self) -> Option<AddressSync> {
        if !self.flow.refresh_process_payment() {
            return None;
        }

        let sync = self.flow.set_addresses().await;
        self.registry
            .register_payment_action(&self.method.code, self.flow.clone() as BoxedPaymentAction);

        Some(sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, SESSION_QUERY};
    use checkout_core::PaymentActions;
    use std::sync::atomic::Ordering;

    fn amazon_pay() -> PaymentMethod {
        PaymentMethod::new("amazon_payment_v2", "Amazon Pay")
    }

    fn row(harness: &Harness, query: &str, registry: Arc<PaymentActions>) -> AmazonPayMethod {
        AmazonPayMethod::new(amazon_pay(), Arc::new(harness.flow(query)), registry)
    }

    #[test]
    fn test_view_selected_and_unselected() {
        let harness = Harness::default();
        let row = row(&harness, "", Arc::new(PaymentActions::new()));

        let selected = row.view(&amazon_pay());
        assert!(selected.radio.checked);
        assert_eq!(selected.radio.name, "paymentMethod");
        assert_eq!(selected.radio.label, "Amazon Pay");
        assert_eq!(selected.button_container, Some("AmazonPayButton"));

        let other = row.view(&PaymentMethod::new("checkmo", "Check / Money order"));
        assert!(!other.radio.checked);
        assert_eq!(other.radio.value, "amazon_payment_v2");
        assert_eq!(other.button_container, None);
    }

    #[test]
    fn test_mount_loads_sdk() {
        let harness = Harness::default();
        row(&harness, "", Arc::new(PaymentActions::new()))
            .on_mount()
            .unwrap();

        assert_eq!(harness.sdk.scripts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_select_switches_payment_method() {
        let harness = Harness::ready();
        *harness.cart.selected_payment.lock().unwrap() = Some("checkmo".into());

        row(&harness, "", Arc::new(PaymentActions::new()))
            .on_select()
            .await
            .unwrap();

        assert_eq!(
            *harness.cart.payment_sets.lock().unwrap(),
            vec!["amazon_payment_v2"]
        );
        assert_eq!(harness.sdk.renders.lock().unwrap().len(), 1);
        assert!(!harness.app.loader_visible());
    }

    #[tokio::test]
    async fn test_select_keeps_active_method() {
        let harness = Harness::ready();
        *harness.cart.selected_payment.lock().unwrap() = Some("amazon_payment_v2".into());

        row(&harness, "", Arc::new(PaymentActions::new()))
            .on_select()
            .await
            .unwrap();

        assert!(harness.cart.payment_sets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_select_without_config_reports() {
        let harness = Harness::ready();
        *harness.api.config.lock().unwrap() = None;

        let result = row(&harness, "", Arc::new(PaymentActions::new()))
            .on_select()
            .await;

        assert!(result.is_err());
        assert_eq!(harness.app.errors(), vec![PAYMENT_NOT_AVAILABLE]);
        assert!(harness.cart.payment_sets.lock().unwrap().is_empty());
        assert!(!harness.app.loader_visible());
    }

    #[tokio::test]
    async fn test_process_payment_syncs_and_registers() {
        let harness = Harness::ready();
        let registry = Arc::new(PaymentActions::new());
        let row = row(&harness, SESSION_QUERY, registry.clone());

        assert_eq!(row.on_process_payment_enabled().await, Some(AddressSync::Synced));
        assert!(registry.has_action("amazon_payment_v2"));

        let outcome = registry.submit("amazon_payment_v2").await.unwrap();
        assert_eq!(
            outcome.redirect_url(),
            Some("https://shop.test/checkout/onepage/success")
        );
        assert_eq!(
            harness.navigator.visits(),
            vec!["https://shop.test/checkout/onepage/success"]
        );
    }

    #[tokio::test]
    async fn test_process_payment_disabled_without_session() {
        let harness = Harness::ready();
        let registry = Arc::new(PaymentActions::new());
        let row = row(&harness, "", registry.clone());

        assert_eq!(row.on_process_payment_enabled().await, None);
        assert!(!registry.has_action("amazon_payment_v2"));
        assert!(harness.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_process_payment_registers_even_if_sync_fails() {
        let harness = Harness::ready();
        harness.api.fail_requests.store(true, Ordering::SeqCst);
        let registry = Arc::new(PaymentActions::new());
        let row = row(&harness, SESSION_QUERY, registry.clone());

        assert_eq!(row.on_process_payment_enabled().await, Some(AddressSync::Failed));
        assert!(registry.has_action("amazon_payment_v2"));
        assert_eq!(harness.app.errors(), vec![PAYMENT_NOT_AVAILABLE]);
        assert!(!harness.app.loader_visible());
    }

    #[tokio::test]
    async fn test_select_with_failing_backend_reports() {
        let harness = Harness::ready();
        harness.api.fail_requests.store(true, Ordering::SeqCst);
        *harness.cart.selected_payment.lock().unwrap() = Some("checkmo".into());

        let result = row(&harness, "", Arc::new(PaymentActions::new()))
            .on_select()
            .await;

        assert!(result.is_err());
        assert_eq!(harness.app.errors(), vec![PAYMENT_NOT_AVAILABLE]);
        assert!(harness.cart.payment_sets.lock().unwrap().is_empty());
        assert!(harness.sdk.renders.lock().unwrap().is_empty());
        assert!(!harness.app.loader_visible());
    }
}
