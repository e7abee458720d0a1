//! # Checkout Error Types
//!
//! Typed error handling for the checkout integration.
//! All fallible operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Message shown when the payment method cannot be offered or addresses
/// could not be synced.
pub const PAYMENT_NOT_AVAILABLE: &str = "Amazon pay not available";

/// Message shown when finalizing the checkout session failed.
pub const TRANSACTION_FAILED: &str =
    "This transaction could not be performed. Please select another payment method.";

/// Message shown when required checkout agreements are unchecked.
pub const AGREEMENTS_REQUIRED: &str =
    "Please agree to the terms and conditions first before placing the order again.";

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing env vars, invalid base URL)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session config missing or vendor SDK not loaded
    #[error("Payment not available: {0}")]
    NotAvailable(String),

    /// No checkout session identifier on the current page
    #[error("No checkout session identifier on the current page")]
    MissingSession,

    /// Network/HTTP error talking to the storefront backend
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Backend error [{status}]: {message}")]
    Provider { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A cart, form or app collaborator rejected a write
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Checkout agreements exist but are not all checked
    #[error("Checkout agreements not accepted")]
    AgreementsNotAccepted,
}

impl CheckoutError {
    /// The shopper-facing message for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            CheckoutError::AgreementsNotAccepted => AGREEMENTS_REQUIRED,
            CheckoutError::Network(_) | CheckoutError::Provider { .. } => TRANSACTION_FAILED,
            _ => PAYMENT_NOT_AVAILABLE,
        }
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
