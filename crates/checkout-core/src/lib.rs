//! # checkout-core
//!
//! Core types and traits for the Amazon Pay checkout integration.
//!
//! This crate provides:
//! - `CheckoutSessionApi` trait for the storefront backend endpoints
//! - `ProviderAddress`, `CartAddress` and the provider → storefront mapping
//! - `CheckoutSessionId`, `SessionConfig` and `ButtonOptions`
//! - Collaborator traits for cart, form, agreements, page feedback, SDK and navigation
//! - `PaymentActions` registry and `PlaceOrderOutcome`
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CartAddress, CheckoutSessionId};
//!
//! let session_id = CheckoutSessionId::from_query(&location_search)
//!     .ok_or(CheckoutError::MissingSession)?;
//!
//! let shipping = api.shipping_addresses(&session_id).await?;
//! let address = CartAddress::from_provider(&shipping[0], cart.cart_id().as_deref());
//! ```

pub mod action;
pub mod address;
pub mod api;
pub mod context;
pub mod error;
pub mod session;

// Re-exports for convenience
pub use action::{
    BoxedPaymentAction, PaymentAction, PaymentActionRegistry, PaymentActions, PlaceOrderOutcome,
    SkipReason,
};
pub use address::{AddressComparison, AddressFields, CartAddress, ProviderAddress, SavedAddress};
pub use api::{BoxedCheckoutSessionApi, CheckoutSessionApi};
pub use context::{
    AmazonPaySdk, AppContext, CartContext, CheckoutAgreements, CheckoutContext, CheckoutForm,
    FormSection, Navigator, PaymentMethod, ShippingMethod,
};
pub use error::{
    CheckoutError, CheckoutResult, AGREEMENTS_REQUIRED, PAYMENT_NOT_AVAILABLE, TRANSACTION_FAILED,
};
pub use session::{
    ButtonOptions, CheckoutSessionId, CreateCheckoutSessionConfig, SessionConfig, BUTTON_CONTAINER,
    SESSION_QUERY_PARAM,
};
