//! # amazon-checkout
//!
//! Drive the Amazon Pay checkout flow against a storefront backend.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STOREFRONT_BASE_URL=https://shop.example.com
//! export STOREFRONT_REST_PREFIX=/rest/de_storeview
//!
//! # Run with the URL the provider sent the shopper back to
//! amazon-checkout 'https://shop.example.com/checkout?amazonCheckoutSessionId=...'
//! ```

use checkout_amazon::{AmazonCheckoutClient, AmazonPayFlow, AmazonPayMethod};
use checkout_cli::{
    load_snapshot, page_query, InMemoryCart, InMemoryForm, LoggingApp, LoggingSdk,
    RecordingNavigator, StaticAgreements,
};
use checkout_core::{CheckoutContext, FormSection, PaymentActions, PaymentMethod};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    dotenvy::dotenv().ok();

    let return_url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: amazon-checkout <return-url-or-query>"))?;

    let client = AmazonCheckoutClient::from_env()?;
    let config = client.config().clone();
    let snapshot = load_snapshot()?;

    info!("Storefront: {}{}", config.base_url, config.rest_prefix);
    info!("Payment method: {}", config.method_code);

    let cart = Arc::new(InMemoryCart::from_snapshot(&snapshot));
    let form = Arc::new(InMemoryForm::default());
    let app = Arc::new(LoggingApp::default());
    let navigator = Arc::new(RecordingNavigator::default());

    let context = CheckoutContext {
        cart: cart.clone(),
        form: form.clone(),
        agreements: Arc::new(StaticAgreements {
            required: snapshot.agreements.required,
            accepted: snapshot.agreements.accepted,
        }),
        app: app.clone(),
        sdk: Arc::new(LoggingSdk),
        navigator: navigator.clone(),
    };

    let flow = AmazonPayFlow::new(&config, Arc::new(client), context, page_query(&return_url));
    let actions = Arc::new(PaymentActions::new());
    let row = AmazonPayMethod::new(
        PaymentMethod::new(config.method_code.clone(), "Amazon Pay"),
        Arc::new(flow),
        actions.clone(),
    );

    row.on_mount()?;

    if let Err(e) = row.on_select().await {
        warn!("Button could not be rendered: {}", e);
    }

    match row.on_process_payment_enabled().await {
        Some(sync) => info!("Address sync: {:?}", sync),
        None => anyhow::bail!("No checkout session id in {}", return_url),
    }

    if let Some(shipping) = form.section(FormSection::ShippingAddress) {
        info!("Shipping address: {}", serde_json::to_string(&shipping)?);
    }

    let outcome = actions
        .submit(&config.method_code)
        .await
        .ok_or_else(|| anyhow::anyhow!("No payment action registered"))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.is_placed() {
        let message = app
            .last_error()
            .unwrap_or_else(|| format!("Order not placed: {:?}", outcome));
        anyhow::bail!(message);
    }
    if let Some(target) = navigator.target() {
        info!("Shopper would be sent to {}", target);
    }

    Ok(())
}
