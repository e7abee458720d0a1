//! # checkout-cli
//!
//! Headless driver for the Amazon Pay checkout flow.
//!
//! Runs the same handlers the checkout page would, against a real storefront
//! backend, with in-memory cart and form state:
//!
//! | Step | Handler | Backend call |
//! |------|---------|--------------|
//! | 1 | `on_mount` | - |
//! | 2 | `on_select` | GET `/V1/amazon-checkout-session/config` |
//! | 3 | `on_process_payment_enabled` | GET `.../{id}/shipping-address`, `.../billing-address` |
//! | 4 | form submit | POST `.../{id}/update` |

pub mod memory;
pub mod snapshot;

pub use memory::{
    InMemoryCart, InMemoryForm, LoggingApp, LoggingSdk, RecordingNavigator, StaticAgreements,
};
pub use snapshot::{load_snapshot, page_query, CheckoutSnapshot};
