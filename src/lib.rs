/// STFU - Browser extension that mutes tabs by URL prefix
/// Built with Rust + WASM

mod background;
mod browser;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod host;
pub mod matcher;
mod popup;
pub mod rules;
pub mod store;
pub mod sync;
pub mod tab_data;

#[cfg(test)]
mod testing;

use std::cell::RefCell;

use config::MuterConfig;
use wasm_bindgen::prelude::*;

thread_local! {
    static CONFIG: RefCell<MuterConfig> = RefCell::new(MuterConfig::default());
}

pub(crate) fn current_config() -> MuterConfig {
    CONFIG.with(|config| config.borrow().clone())
}

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Override settings from a JS object; missing fields keep their defaults
#[wasm_bindgen]
pub fn configure(options: JsValue) -> Result<(), JsValue> {
    if options.is_null() || options.is_undefined() {
        return Ok(());
    }
    let parsed: MuterConfig = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {:?}", e)))?;
    CONFIG.with(|config| *config.borrow_mut() = parsed);
    Ok(())
}

// Start the background engine
#[wasm_bindgen]
pub fn start_background(options: JsValue) -> Result<(), JsValue> {
    configure(options)?;
    background::start(current_config());
    Ok(())
}

// Re-export the prefix predicate for JavaScript access
#[wasm_bindgen]
pub fn url_matches_prefix(url: Option<String>, prefixes: Vec<String>) -> bool {
    matcher::url_matches_prefix(url.as_deref(), &prefixes)
}
