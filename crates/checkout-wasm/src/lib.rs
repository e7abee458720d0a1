//! # checkout-wasm
//!
//! WebAssembly bindings for the Amazon Pay checkout integration.
//!
//! This crate provides:
//! - `BrowserSdk` and `BrowserNavigator`, the browser implementations of the
//!   `AmazonPaySdk` and `Navigator` collaborators
//! - JS-callable helpers for session id extraction, address mapping and
//!   button options
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { load_sdk, render_button, current_checkout_session_id } from 'checkout-wasm';
//!
//! await init();
//!
//! load_sdk('https://static-eu.payments-amazon.com/checkout.js');
//! render_button(await fetchConfig());
//!
//! const sessionId = current_checkout_session_id();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use checkout_core::{
    AddressComparison, AmazonPaySdk, ButtonOptions, CartAddress, CheckoutError, CheckoutResult,
    CheckoutSessionId, Navigator, ProviderAddress, SessionConfig, BUTTON_CONTAINER,
    PAYMENT_NOT_AVAILABLE,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// `amazon.Pay.renderButton(selector, options)`
    #[wasm_bindgen(catch, js_namespace = ["amazon", "Pay"], js_name = renderButton)]
    fn amazon_pay_render_button(container: &str, options: JsValue) -> Result<JsValue, JsValue>;
}

/// The vendor SDK as loaded into the current page
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSdk;

impl AmazonPaySdk for BrowserSdk {
    fn is_loaded(&self) -> bool {
        sdk_present()
    }

    fn load_script(&self, src: &str) -> CheckoutResult<()> {
        inject_script(src).map_err(js_error)
    }

    fn render_button(&self, container: &str, options: &ButtonOptions) -> CheckoutResult<()> {
        let options = to_js(options).map_err(js_error)?;
        amazon_pay_render_button(container, options).map_err(js_error)?;
        Ok(())
    }
}

/// Full-page navigation through `window.location`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        let result = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| window.location().set_href(url));

        if let Err(e) = result {
            web_sys::console::error_2(&JsValue::from_str("navigation failed:"), &e);
        }
    }
}

fn js_error(value: JsValue) -> CheckoutError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"));
    CheckoutError::NotAvailable(message)
}

/// Serialize to plain JS objects rather than `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn sdk_present() -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &JsValue::from_str("amazon")).ok())
        .is_some_and(|amazon| !amazon.is_undefined() && !amazon.is_null())
}

fn inject_script(src: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document
        .query_selector(&format!("script[src=\"{src}\"]"))?
        .is_some()
    {
        return Ok(());
    }

    let script = document
        .create_element("script")?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(JsValue::from)?;
    script.set_src(src);
    script.set_async(true);

    document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?
        .append_child(&script)?;
    Ok(())
}

/// Session id from a query string, `undefined` when absent or empty
#[wasm_bindgen]
pub fn checkout_session_id(search: &str) -> Option<String> {
    CheckoutSessionId::from_query(search).map(|id| id.as_str().to_string())
}

/// Session id from the current page URL
#[wasm_bindgen]
pub fn current_checkout_session_id() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    checkout_session_id(&search)
}

/// Map a provider address record into the storefront shape
#[wasm_bindgen]
pub fn parse_address(address: JsValue, cart_id: Option<String>) -> Result<JsValue, JsValue> {
    let address: ProviderAddress = serde_wasm_bindgen::from_value(address)
        .map_err(|e| JsValue::from_str(&format!("Invalid address: {}", e)))?;

    to_js(&CartAddress::from_provider(&address, cart_id.as_deref()))
}

/// Whether the provider returned the exact same record for both addresses
#[wasm_bindgen]
pub fn same_address(shipping: JsValue, billing: JsValue) -> Result<bool, JsValue> {
    let shipping: ProviderAddress = serde_wasm_bindgen::from_value(shipping)?;
    let billing: ProviderAddress = serde_wasm_bindgen::from_value(billing)?;

    Ok(AddressComparison::Exact.same_address(&shipping, &billing))
}

/// Options object for `amazon.Pay.renderButton` from a config response
#[wasm_bindgen]
pub fn button_options(config: JsValue) -> Result<JsValue, JsValue> {
    to_js(&options_from_response(config)?)
}

fn options_from_response(config: JsValue) -> Result<ButtonOptions, JsValue> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(config)?;
    let config = SessionConfig::from_response(value)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .ok_or_else(|| JsValue::from_str(PAYMENT_NOT_AVAILABLE))?;

    Ok(ButtonOptions::from(&config))
}

/// Inject the vendor SDK script unless it is already on the page
#[wasm_bindgen]
pub fn load_sdk(src: &str) -> Result<(), JsValue> {
    if sdk_present() {
        return Ok(());
    }
    inject_script(src)
}

/// Render the vendor button from a config response
#[wasm_bindgen]
pub fn render_button(config: JsValue) -> Result<(), JsValue> {
    let options = options_from_response(config)?;

    BrowserSdk
        .render_button(BUTTON_CONTAINER, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
