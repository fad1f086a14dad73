/// FlowAI Bridge - Chrome Extension for reusable prompt context
/// Built with Rust + WASM + Yew

pub mod browser;
pub mod bucket;
pub mod config;
pub mod error;
pub mod inject;
pub mod repository;
pub mod storage;
pub mod ui;

use config::FlowConfig;
use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup(config: JsValue) {
    let props = ui::popup::PopupProps {
        config: FlowConfig::from_js(config),
    };
    yew::Renderer::<ui::popup::App>::with_props(props).render();
}

// Mount the floating overlay into the host page (content script)
#[wasm_bindgen]
pub fn start_overlay(config: JsValue) {
    ui::overlay::mount(FlowConfig::from_js(config));
}

// Inject text into the current page without the overlay, e.g. from a keyboard command
#[wasm_bindgen]
pub fn inject_context(content: &str) -> Result<JsValue, JsValue> {
    let page = browser::DomPage::current().ok_or_else(|| JsValue::from_str("no document"))?;
    let outcome =
        inject::inject(&page, content).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&outcome).map_err(JsValue::from)
}
