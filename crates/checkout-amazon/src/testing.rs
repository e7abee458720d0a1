//! In-memory collaborators that record every call, for the flow tests.

use crate::config::AmazonPayConfig;
use crate::flow::AmazonPayFlow;
use async_trait::async_trait;
use checkout_core::{
    AddressFields, AmazonPaySdk, AppContext, ButtonOptions, CartAddress, CartContext,
    CheckoutAgreements, CheckoutContext, CheckoutError, CheckoutForm, CheckoutResult,
    CheckoutSessionApi, CheckoutSessionId, FormSection, Navigator, ProviderAddress, SavedAddress,
    SessionConfig, ShippingMethod,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const SESSION_QUERY: &str = "?amazonCheckoutSessionId=S-1";

pub fn session_config() -> SessionConfig {
    SessionConfig {
        merchant_id: "M1".into(),
        public_key_id: "PK".into(),
        ledger_currency: "EUR".into(),
        checkout_language: "de_DE".into(),
        button_color: None,
        checkout_review_payload: "{}".into(),
        checkout_review_signature: "sig".into(),
        sandbox: true,
    }
}

pub fn address(firstname: &str) -> ProviderAddress {
    ProviderAddress {
        firstname: Some(firstname.into()),
        lastname: Some("B".into()),
        postcode: Some("12345".into()),
        country_id: Some("DE".into()),
        telephone: Some("555".into()),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub config: Mutex<Option<SessionConfig>>,
    pub shipping: Mutex<Vec<ProviderAddress>>,
    pub billing: Mutex<Vec<ProviderAddress>>,
    pub redirect: Mutex<Option<String>>,
    pub fail_requests: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> CheckoutResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(CheckoutError::Network("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CheckoutSessionApi for FakeApi {
    async fn session_config(&self) -> CheckoutResult<Option<SessionConfig>> {
        self.record("config".into())?;
        Ok(self.config.lock().unwrap().clone())
    }

    async fn shipping_addresses(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Vec<ProviderAddress>> {
        self.record(format!("shipping:{session_id}"))?;
        Ok(self.shipping.lock().unwrap().clone())
    }

    async fn billing_addresses(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Vec<ProviderAddress>> {
        self.record(format!("billing:{session_id}"))?;
        Ok(self.billing.lock().unwrap().clone())
    }

    async fn update_session(
        &self,
        session_id: &CheckoutSessionId,
    ) -> CheckoutResult<Option<String>> {
        self.record(format!("update:{session_id}"))?;
        Ok(self.redirect.lock().unwrap().clone())
    }
}

/// Recorded cart address write: (kind, address, same-address flag)
pub type AddressWrite = (&'static str, CartAddress, bool);

pub struct FakeCart {
    pub selected_payment: Mutex<Option<String>>,
    pub shipping_method: Mutex<Option<ShippingMethod>>,
    pub billing: Mutex<Option<AddressFields>>,
    pub fail_writes: AtomicBool,
    pub payment_sets: Mutex<Vec<String>>,
    pub address_writes: Mutex<Vec<AddressWrite>>,
}

impl Default for FakeCart {
    fn default() -> Self {
        Self {
            selected_payment: Mutex::new(None),
            shipping_method: Mutex::new(Some(ShippingMethod {
                carrier_code: "flatrate".into(),
                method_code: "flatrate".into(),
            })),
            billing: Mutex::new(Some(AddressFields {
                firstname: Some("A".into()),
                lastname: Some("B".into()),
                zipcode: Some("12345".into()),
                ..Default::default()
            })),
            fail_writes: AtomicBool::new(false),
            payment_sets: Mutex::new(Vec::new()),
            address_writes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeCart {
    pub fn address_writes(&self) -> Vec<AddressWrite> {
        self.address_writes.lock().unwrap().clone()
    }

    fn save(
        &self,
        kind: &'static str,
        address: CartAddress,
        same: bool,
    ) -> CheckoutResult<SavedAddress> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CheckoutError::Collaborator("cart mutation rejected".into()));
        }
        self.address_writes
            .lock()
            .unwrap()
            .push((kind, address.clone(), same));

        let full_name = format!(
            "{} {}",
            address.fields.firstname.clone().unwrap_or_default(),
            address.fields.lastname.clone().unwrap_or_default()
        );
        Ok(SavedAddress {
            fields: address.fields,
            full_name: Some(full_name),
        })
    }
}

#[async_trait]
impl CartContext for FakeCart {
    fn cart_id(&self) -> Option<String> {
        Some("cart-1".into())
    }

    fn selected_payment_method(&self) -> Option<String> {
        self.selected_payment.lock().unwrap().clone()
    }

    fn selected_shipping_method(&self) -> Option<ShippingMethod> {
        self.shipping_method.lock().unwrap().clone()
    }

    fn billing_address(&self) -> Option<AddressFields> {
        self.billing.lock().unwrap().clone()
    }

    async fn set_payment_method(&self, code: &str) -> CheckoutResult<()> {
        self.payment_sets.lock().unwrap().push(code.to_string());
        *self.selected_payment.lock().unwrap() = Some(code.to_string());
        Ok(())
    }

    async fn add_shipping_address(
        &self,
        address: CartAddress,
        same_as_billing: bool,
    ) -> CheckoutResult<SavedAddress> {
        self.save("shipping", address, same_as_billing)
    }

    async fn set_billing_address(
        &self,
        address: CartAddress,
        same_as_shipping: bool,
    ) -> CheckoutResult<SavedAddress> {
        self.save("billing", address, same_as_shipping)
    }
}

#[derive(Default)]
pub struct FakeForm {
    pub values: Mutex<Vec<(FormSection, AddressFields)>>,
}

impl CheckoutForm for FakeForm {
    fn set_field_value(&self, section: FormSection, address: AddressFields) {
        self.values.lock().unwrap().push((section, address));
    }
}

#[derive(Default)]
pub struct FakeAgreements {
    pub has: AtomicBool,
    pub checked: AtomicBool,
}

impl CheckoutAgreements for FakeAgreements {
    fn has_agreements(&self) -> bool {
        self.has.load(Ordering::SeqCst)
    }

    fn all_agreements_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeApp {
    pub loader: Mutex<Vec<bool>>,
    pub errors: Mutex<Vec<String>>,
}

impl FakeApp {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn loader_visible(&self) -> bool {
        self.loader.lock().unwrap().last().copied().unwrap_or(false)
    }
}

impl AppContext for FakeApp {
    fn set_page_loader(&self, visible: bool) {
        self.loader.lock().unwrap().push(visible);
    }

    fn set_error_message(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct FakeSdk {
    pub loaded: AtomicBool,
    pub scripts: Mutex<Vec<String>>,
    pub fail_scripts: AtomicBool,
    pub renders: Mutex<Vec<(String, ButtonOptions)>>,
}

impl AmazonPaySdk for FakeSdk {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn load_script(&self, src: &str) -> CheckoutResult<()> {
        self.scripts.lock().unwrap().push(src.to_string());
        if self.fail_scripts.load(Ordering::SeqCst) {
            return Err(CheckoutError::NotAvailable("no document body".into()));
        }
        Ok(())
    }

    fn render_button(&self, container: &str, options: &ButtonOptions) -> CheckoutResult<()> {
        self.renders
            .lock()
            .unwrap()
            .push((container.to_string(), options.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNavigator {
    pub visits: Mutex<Vec<String>>,
}

impl FakeNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for FakeNavigator {
    fn navigate(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }
}

/// Every fake, kept concrete so tests can inspect them
#[derive(Default)]
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub cart: Arc<FakeCart>,
    pub form: Arc<FakeForm>,
    pub agreements: Arc<FakeAgreements>,
    pub app: Arc<FakeApp>,
    pub sdk: Arc<FakeSdk>,
    pub navigator: Arc<FakeNavigator>,
}

impl Harness {
    /// Harness whose backend has both addresses and a redirect ready
    pub fn ready() -> Self {
        let harness = Self::default();
        *harness.api.config.lock().unwrap() = Some(session_config());
        *harness.api.shipping.lock().unwrap() = vec![address("A")];
        *harness.api.billing.lock().unwrap() = vec![address("C")];
        *harness.api.redirect.lock().unwrap() =
            Some("https://shop.test/checkout/onepage/success".into());
        harness.sdk.loaded.store(true, Ordering::SeqCst);
        harness
    }

    pub fn context(&self) -> CheckoutContext {
        CheckoutContext {
            cart: self.cart.clone(),
            form: self.form.clone(),
            agreements: self.agreements.clone(),
            app: self.app.clone(),
            sdk: self.sdk.clone(),
            navigator: self.navigator.clone(),
        }
    }

    pub fn flow(&self, page_query: &str) -> AmazonPayFlow {
        let config = AmazonPayConfig::new("https://shop.test");
        AmazonPayFlow::new(&config, self.api.clone(), self.context(), page_query)
    }
}
