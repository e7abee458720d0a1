//! # Checkout Collaborators
//!
//! Interfaces to the state the checkout integration reads and writes but does
//! not own: the cart, the checkout form, the agreements block, page-wide
//! feedback, the vendor SDK and browser navigation.
//!
//! Hosting UI layers implement these; the browser bindings live in
//! `checkout-wasm` and in-memory versions in `checkout-cli`.

use crate::address::{AddressFields, CartAddress, SavedAddress};
use crate::error::CheckoutResult;
use crate::session::ButtonOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A payment method as listed on the checkout page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub code: String,
    #[serde(default)]
    pub title: String,
}

impl PaymentMethod {
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
        }
    }
}

/// The shipping method selected on the cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    #[serde(default)]
    pub carrier_code: String,
    #[serde(default)]
    pub method_code: String,
}

impl ShippingMethod {
    pub fn is_selected(&self) -> bool {
        !self.carrier_code.is_empty() && !self.method_code.is_empty()
    }
}

/// Checkout form section an address is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSection {
    ShippingAddress,
    BillingAddress,
}

impl FormSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormSection::ShippingAddress => "shipping_address",
            FormSection::BillingAddress => "billing_address",
        }
    }
}

impl fmt::Display for FormSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cart state shared by every payment method row.
///
/// Writes are not transactional with respect to other rows.
#[async_trait]
pub trait CartContext: Send + Sync {
    fn cart_id(&self) -> Option<String>;

    /// Code of the currently selected payment method, `None` if unset.
    fn selected_payment_method(&self) -> Option<String>;

    fn selected_shipping_method(&self) -> Option<ShippingMethod>;

    fn billing_address(&self) -> Option<AddressFields>;

    /// Check if the cart carries a usable billing address.
    fn has_billing_address(&self) -> bool {
        self.billing_address()
            .is_some_and(|address| address.is_complete_billing())
    }

    /// Check if a shipping method is selected.
    fn has_shipping_method(&self) -> bool {
        self.selected_shipping_method()
            .is_some_and(|method| method.is_selected())
    }

    async fn set_payment_method(&self, code: &str) -> CheckoutResult<()>;

    async fn add_shipping_address(
        &self,
        address: CartAddress,
        same_as_billing: bool,
    ) -> CheckoutResult<SavedAddress>;

    async fn set_billing_address(
        &self,
        address: CartAddress,
        same_as_shipping: bool,
    ) -> CheckoutResult<SavedAddress>;
}

/// Checkout form state
pub trait CheckoutForm: Send + Sync {
    fn set_field_value(&self, section: FormSection, address: AddressFields);
}

/// Terms and conditions checkboxes
pub trait CheckoutAgreements: Send + Sync {
    fn has_agreements(&self) -> bool;
    fn all_agreements_checked(&self) -> bool;
}

/// Page-wide feedback: loading overlay and error banner
pub trait AppContext: Send + Sync {
    fn set_page_loader(&self, visible: bool);
    fn set_error_message(&self, message: &str);
}

/// Loader for and handle to the vendor's browser SDK
pub trait AmazonPaySdk: Send + Sync {
    /// Check if the vendor SDK global is present on the page.
    fn is_loaded(&self) -> bool;

    /// Inject the vendor script. Only called when `is_loaded` is false.
    fn load_script(&self, src: &str) -> CheckoutResult<()>;

    fn render_button(&self, container: &str, options: &ButtonOptions) -> CheckoutResult<()>;
}

/// Full-page browser navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// The collaborators one payment method row works against
#[derive(Clone)]
pub struct CheckoutContext {
    pub cart: Arc<dyn CartContext>,
    pub form: Arc<dyn CheckoutForm>,
    pub agreements: Arc<dyn CheckoutAgreements>,
    pub app: Arc<dyn AppContext>,
    pub sdk: Arc<dyn AmazonPaySdk>,
    pub navigator: Arc<dyn Navigator>,
}
