/// Rule editor entry points for the popup page
use wasm_bindgen::prelude::*;

use crate::browser::{BrowserStorage, BrowserTabs, RuntimeChannel, to_js};
use crate::editor::RuleEditor;
use crate::error::EditorError;

type PopupEditor = RuleEditor<BrowserStorage, BrowserTabs, RuntimeChannel>;

fn editor() -> PopupEditor {
    let config = crate::current_config();
    let storage = BrowserStorage::new(&config.storage_area);
    RuleEditor::new(storage, BrowserTabs, RuntimeChannel, config)
}

fn to_js_error(e: EditorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Rules as `[{url, enabled}]`, sorted for display
#[wasm_bindgen]
pub async fn list_prefixes() -> Result<JsValue, JsValue> {
    let rules = editor().list().await.map_err(to_js_error)?;
    to_js(&rules).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub async fn add_prefix(input: String) -> Result<JsValue, JsValue> {
    let rule = editor().add_prefix(&input).await.map_err(to_js_error)?;
    to_js(&rule).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub async fn toggle_prefix(url: String) -> Result<bool, JsValue> {
    editor().toggle_prefix(&url).await.map_err(to_js_error)
}

#[wasm_bindgen]
pub async fn remove_prefix(url: String) -> Result<(), JsValue> {
    editor().remove_prefix(&url).await.map_err(to_js_error)
}

#[wasm_bindgen]
pub async fn add_current_tab() -> Result<JsValue, JsValue> {
    let rule = editor().add_current_tab().await.map_err(to_js_error)?;
    to_js(&rule).map_err(|e| JsValue::from_str(&e))
}
