//! # Amazon Pay Checkout Flow
//!
//! Sequences the backend calls against checkout events:
//!
//! ```text
//! select method ──▶ session config ──▶ render vendor button
//!                                            │
//!                   shopper returns with ?amazonCheckoutSessionId=…
//!                                            ▼
//!        shipping + billing fetch ──▶ cart writes ──▶ form writes ──▶ latch
//!                                            │
//!                             submit ──▶ finalize ──▶ redirect
//! ```
//!
//! Address sync is guarded by a one-shot latch; `reset_address_sync` is the
//! only way to run it again.

use crate::config::AmazonPayConfig;
use crate::place_order::OrderPlacement;
use async_trait::async_trait;
use checkout_core::{
    AddressComparison, BoxedCheckoutSessionApi, ButtonOptions, CartAddress, CheckoutContext,
    CheckoutError, CheckoutResult, CheckoutSessionId, FormSection, PaymentAction,
    PlaceOrderOutcome, SkipReason, AGREEMENTS_REQUIRED, BUTTON_CONTAINER, PAYMENT_NOT_AVAILABLE,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, instrument, warn};

/// Result of one address sync attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSync {
    /// Both addresses written to cart and form
    Synced,
    /// Latch already set, nothing done
    AlreadySynced,
    /// Page has no checkout session id
    NoSession,
    /// Provider returned no shipping or no billing record
    Unavailable,
    /// A fetch or write failed
    Failed,
}

impl AddressSync {
    pub fn is_synced(&self) -> bool {
        matches!(self, AddressSync::Synced)
    }
}

/// Checkout-session orchestration for one Amazon Pay method row
pub struct AmazonPayFlow {
    method_code: String,
    expected_code: String,
    script_url: String,
    page_query: String,
    api: BoxedCheckoutSessionApi,
    context: CheckoutContext,
    placement: OrderPlacement,
    comparison: AddressComparison,
    script_requested: AtomicBool,
    process_payment_enabled: AtomicBool,
    addresses_set: AtomicBool,
}

impl AmazonPayFlow {
    /// Create a flow for the configured method code.
    ///
    /// `page_query` is the current page's query string (`location.search`).
    pub fn new(
        config: &AmazonPayConfig,
        api: BoxedCheckoutSessionApi,
        context: CheckoutContext,
        page_query: impl Into<String>,
    ) -> Self {
        let placement = OrderPlacement::new(
            api.clone(),
            context.app.clone(),
            context.navigator.clone(),
        );

        Self {
            method_code: config.method_code.clone(),
            expected_code: config.method_code.clone(),
            script_url: config.script_url.clone(),
            page_query: page_query.into(),
            api,
            context,
            placement,
            comparison: AddressComparison::default(),
            script_requested: AtomicBool::new(false),
            process_payment_enabled: AtomicBool::new(false),
            addresses_set: AtomicBool::new(false),
        }
    }

    /// Builder: bind the flow to the row's method code
    pub fn for_method(mut self, code: impl Into<String>) -> Self {
        self.method_code = code.into();
        self
    }

    /// Builder: choose how "billing same as shipping" is decided
    pub fn with_address_comparison(mut self, comparison: AddressComparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn method_code(&self) -> &str {
        &self.method_code
    }

    pub fn context(&self) -> &CheckoutContext {
        &self.context
    }

    /// Session id from the page URL, if the shopper came back from the provider
    pub fn session_id(&self) -> Option<CheckoutSessionId> {
        CheckoutSessionId::from_query(&self.page_query)
    }

    /// Inject the vendor SDK unless it is already on the page.
    pub fn ensure_sdk_loaded(&self) -> CheckoutResult<()> {
        if self.context.sdk.is_loaded() || self.script_requested.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Loading vendor SDK from {}", self.script_url);
        if let Err(e) = self.context.sdk.load_script(&self.script_url) {
            self.script_requested.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    /// Re-evaluate whether the flow may proceed to finalize.
    ///
    /// Enabled once the page carries a session id and the cart has no
    /// payment method or this one. Never disabled again.
    pub fn refresh_process_payment(&self) -> bool {
        let selected = self
            .context
            .cart
            .selected_payment_method()
            .unwrap_or_default();

        if self.session_id().is_some() && (selected.is_empty() || selected == self.method_code) {
            self.process_payment_enabled.store(true, Ordering::SeqCst);
        }
        self.process_payment_enabled()
    }

    pub fn process_payment_enabled(&self) -> bool {
        self.process_payment_enabled.load(Ordering::SeqCst)
    }

    /// Fetch the session config and render the vendor button.
    ///
    /// Only acts for the Amazon Pay method code. Resolves to `false`.
    #[instrument(skip(self), fields(method = %self.method_code))]
    pub async fn get_checkout_session_config(&self) -> CheckoutResult<bool> {
        if self.method_code != self.expected_code {
            return Ok(false);
        }

        let app = &self.context.app;
        app.set_page_loader(true);
        let config = self.api.session_config().await;
        app.set_page_loader(false);

        let config = config?.ok_or_else(|| {
            CheckoutError::NotAvailable("backend returned no checkout session config".to_string())
        })?;

        let sdk = &self.context.sdk;
        if !sdk.is_loaded() {
            return Err(CheckoutError::NotAvailable("vendor SDK not loaded".to_string()));
        }

        sdk.render_button(BUTTON_CONTAINER, &ButtonOptions::from(&config))?;
        debug!("Rendered vendor button into {}", BUTTON_CONTAINER);

        Ok(false)
    }

    /// Pull the provider addresses into the cart and the checkout form.
    ///
    /// Runs once; after a successful sync every call returns
    /// `AddressSync::AlreadySynced` without touching anything.
    #[instrument(skip(self), fields(method = %self.method_code))]
    pub async fn set_addresses(&self) -> AddressSync {
        if self.addresses_synced() {
            debug!("Addresses already synced");
            return AddressSync::AlreadySynced;
        }

        let Some(session_id) = self.session_id() else {
            debug!("No checkout session id on page, skipping address sync");
            return AddressSync::NoSession;
        };

        let app = &self.context.app;
        app.set_page_loader(true);

        match self.sync_addresses(&session_id).await {
            Ok(outcome) => {
                app.set_page_loader(false);
                outcome
            }
            Err(e) => {
                error!("Address sync failed: {}", e);
                app.set_error_message(PAYMENT_NOT_AVAILABLE);
                app.set_page_loader(false);
                AddressSync::Failed
            }
        }
    }

    async fn sync_addresses(&self, session_id: &CheckoutSessionId) -> CheckoutResult<AddressSync> {
        let shipping = self.api.shipping_addresses(session_id).await?.into_iter().next();
        let billing = self.api.billing_addresses(session_id).await?.into_iter().next();

        let (Some(shipping), Some(billing)) = (shipping, billing) else {
            warn!("Provider returned no shipping or billing address");
            self.context.app.set_error_message(PAYMENT_NOT_AVAILABLE);
            return Ok(AddressSync::Unavailable);
        };

        let same_address = self.comparison.same_address(&shipping, &billing);
        let cart = &self.context.cart;
        let cart_id = cart.cart_id();

        let shipping_address = CartAddress::from_provider(&shipping, cart_id.as_deref());
        let billing_address = CartAddress::from_provider(&billing, cart_id.as_deref());

        let saved_shipping = cart.add_shipping_address(shipping_address, same_address).await?;
        let saved_billing = cart.set_billing_address(billing_address, same_address).await?;

        let form = &self.context.form;
        form.set_field_value(FormSection::ShippingAddress, saved_shipping.into_form_address());
        form.set_field_value(FormSection::BillingAddress, saved_billing.into_form_address());

        self.addresses_set.store(true, Ordering::SeqCst);
        info!("Synced provider addresses, same_address={}", same_address);

        Ok(AddressSync::Synced)
    }

    pub fn addresses_synced(&self) -> bool {
        self.addresses_set.load(Ordering::SeqCst)
    }

    /// Clear the sync latch so the next `set_addresses` fetches again.
    pub fn reset_address_sync(&self) {
        self.addresses_set.store(false, Ordering::SeqCst);
    }

    /// Place the order if the checkout is ready for it.
    #[instrument(skip(self), fields(method = %self.method_code))]
    pub async fn place_amazon_pay_order(&self) -> PlaceOrderOutcome {
        let Some(session_id) = self.session_id() else {
            return PlaceOrderOutcome::Skipped(SkipReason::MissingSession);
        };

        let cart = &self.context.cart;
        if !cart.has_shipping_method() {
            return PlaceOrderOutcome::Skipped(SkipReason::NoShippingMethod);
        }
        if !cart.has_billing_address() {
            return PlaceOrderOutcome::Skipped(SkipReason::NoBillingAddress);
        }

        let agreements = &self.context.agreements;
        if agreements.has_agreements() && !agreements.all_agreements_checked() {
            warn!("Checkout agreements not accepted");
            self.context.app.set_error_message(AGREEMENTS_REQUIRED);
            return PlaceOrderOutcome::Skipped(SkipReason::AgreementsNotAccepted);
        }

        self.placement.perform(&session_id).await
    }
}

#[async_trait]
impl PaymentAction for AmazonPayFlow {
    async fn place_order(&self) -> PlaceOrderOutcome {
        self.place_amazon_pay_order().await
    }
}
