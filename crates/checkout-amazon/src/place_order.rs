//! # Order Placement
//!
//! Finalizes the checkout session on the backend and sends the browser to
//! the URL it returns.

use checkout_core::{
    AppContext, BoxedCheckoutSessionApi, CheckoutSessionId, Navigator, PlaceOrderOutcome,
    TRANSACTION_FAILED,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Issues the finalize request for one checkout session
#[derive(Clone)]
pub struct OrderPlacement {
    api: BoxedCheckoutSessionApi,
    app: Arc<dyn AppContext>,
    navigator: Arc<dyn Navigator>,
}

impl OrderPlacement {
    pub fn new(
        api: BoxedCheckoutSessionApi,
        app: Arc<dyn AppContext>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { api, app, navigator }
    }

    /// Finalize the session.
    ///
    /// A non-empty string answer is a redirect target and triggers a full
    /// navigation. Failures are logged and shown to the shopper; the page
    /// loader is off again when this returns.
    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    pub async fn perform(&self, session_id: &CheckoutSessionId) -> PlaceOrderOutcome {
        self.app.set_page_loader(true);

        let outcome = match self.api.update_session(session_id).await {
            Ok(Some(redirect)) if !redirect.is_empty() => {
                info!("Redirecting to {}", redirect);
                self.navigator.navigate(&redirect);
                PlaceOrderOutcome::Redirected(redirect)
            }
            Ok(_) => PlaceOrderOutcome::Completed,
            Err(e) => {
                error!("Failed to finalize checkout session: {}", e);
                self.app.set_error_message(TRANSACTION_FAILED);
                PlaceOrderOutcome::Failed
            }
        };

        self.app.set_page_loader(false);
        outcome
    }
}
