//! # In-Memory Collaborators
//!
//! Cart, form, agreements and page feedback kept in process, so the flow can
//! run without a browser. Page feedback and vendor SDK calls are logged.

use crate::snapshot::CheckoutSnapshot;
use async_trait::async_trait;
use checkout_core::{
    AddressFields, AmazonPaySdk, AppContext, ButtonOptions, CartAddress, CartContext,
    CheckoutAgreements, CheckoutForm, CheckoutResult, FormSection, Navigator, SavedAddress,
    ShippingMethod,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct CartState {
    selected_payment_method: Option<String>,
    shipping_address: Option<AddressFields>,
    billing_address: Option<AddressFields>,
}

/// Cart backed by a snapshot, updated by the flow's writes
pub struct InMemoryCart {
    cart_id: Option<String>,
    shipping_method: Option<ShippingMethod>,
    state: Mutex<CartState>,
}

impl InMemoryCart {
    pub fn from_snapshot(snapshot: &CheckoutSnapshot) -> Self {
        Self {
            cart_id: snapshot.cart_id.clone(),
            shipping_method: snapshot.shipping_method.clone(),
            state: Mutex::new(CartState {
                selected_payment_method: snapshot.selected_payment_method.clone(),
                shipping_address: None,
                billing_address: snapshot.billing_address.clone(),
            }),
        }
    }

    pub fn shipping_address(&self) -> Option<AddressFields> {
        lock(&self.state).shipping_address.clone()
    }

    fn saved(address: CartAddress) -> SavedAddress {
        let full_name = [&address.fields.firstname, &address.fields.lastname]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(" ");

        SavedAddress {
            fields: address.fields,
            full_name: Some(full_name),
        }
    }
}

#[async_trait]
impl CartContext for InMemoryCart {
    fn cart_id(&self) -> Option<String> {
        self.cart_id.clone()
    }

    fn selected_payment_method(&self) -> Option<String> {
        lock(&self.state).selected_payment_method.clone()
    }

    fn selected_shipping_method(&self) -> Option<ShippingMethod> {
        self.shipping_method.clone()
    }

    fn billing_address(&self) -> Option<AddressFields> {
        lock(&self.state).billing_address.clone()
    }

    async fn set_payment_method(&self, code: &str) -> CheckoutResult<()> {
        info!("Cart payment method set to {}", code);
        lock(&self.state).selected_payment_method = Some(code.to_string());
        Ok(())
    }

    async fn add_shipping_address(
        &self,
        address: CartAddress,
        _same_as_billing: bool,
    ) -> CheckoutResult<SavedAddress> {
        let saved = Self::saved(address);
        lock(&self.state).shipping_address = Some(saved.fields.clone());
        Ok(saved)
    }

    async fn set_billing_address(
        &self,
        address: CartAddress,
        _same_as_shipping: bool,
    ) -> CheckoutResult<SavedAddress> {
        let saved = Self::saved(address);
        lock(&self.state).billing_address = Some(saved.fields.clone());
        Ok(saved)
    }
}

/// Form sections keyed by name
#[derive(Default)]
pub struct InMemoryForm {
    sections: Mutex<HashMap<FormSection, AddressFields>>,
}

impl InMemoryForm {
    pub fn section(&self, section: FormSection) -> Option<AddressFields> {
        lock(&self.sections).get(&section).cloned()
    }
}

impl CheckoutForm for InMemoryForm {
    fn set_field_value(&self, section: FormSection, address: AddressFields) {
        lock(&self.sections).insert(section, address);
    }
}

/// Agreements fixed by the snapshot
#[derive(Debug, Clone, Copy)]
pub struct StaticAgreements {
    pub required: bool,
    pub accepted: bool,
}

impl CheckoutAgreements for StaticAgreements {
    fn has_agreements(&self) -> bool {
        self.required
    }

    fn all_agreements_checked(&self) -> bool {
        self.accepted
    }
}

/// Page feedback written to the log; the last error is kept
#[derive(Default)]
pub struct LoggingApp {
    last_error: Mutex<Option<String>>,
}

impl LoggingApp {
    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }
}

impl AppContext for LoggingApp {
    fn set_page_loader(&self, visible: bool) {
        tracing::debug!("Page loader {}", if visible { "on" } else { "off" });
    }

    fn set_error_message(&self, message: &str) {
        error!("Shopper message: {}", message);
        *lock(&self.last_error) = Some(message.to_string());
    }
}

/// Stands in for the vendor SDK: the button options are logged
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSdk;

impl AmazonPaySdk for LoggingSdk {
    fn is_loaded(&self) -> bool {
        true
    }

    fn load_script(&self, src: &str) -> CheckoutResult<()> {
        info!("Would load vendor script {}", src);
        Ok(())
    }

    fn render_button(&self, container: &str, options: &ButtonOptions) -> CheckoutResult<()> {
        info!(
            "Render button into {}: {}",
            container,
            serde_json::to_string(options)?
        );
        Ok(())
    }
}

/// Records the redirect instead of following it
#[derive(Default)]
pub struct RecordingNavigator {
    target: Mutex<Option<String>>,
}

impl RecordingNavigator {
    pub fn target(&self) -> Option<String> {
        lock(&self.target).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        *lock(&self.target) = Some(url.to_string());
    }
}
