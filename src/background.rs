/// Background page: wires browser events to the sync engine
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::browser::{self, BrowserStorage, BrowserTabs, to_js};
use crate::config::MuterConfig;
use crate::events::{Message, StorageChanges, TabChange, Trigger};
use crate::sync::{Dispatched, ReconcileReport, SyncEngine};
use crate::tab_data::TabInfo;

type BackgroundEngine = SyncEngine<BrowserStorage, BrowserTabs>;

/// Register every trigger with the host. Listeners live for the page's lifetime.
pub fn start(config: MuterConfig) {
    let storage = BrowserStorage::new(&config.storage_area);
    let engine = Rc::new(SyncEngine::new(storage, BrowserTabs, config));

    listen_lifecycle(&engine);
    listen_tabs(&engine);
    listen_storage(&engine);
    listen_messages(&engine);

    info!("Background listeners registered");
}

fn run(engine: &Rc<BackgroundEngine>, trigger: Trigger) {
    let engine = Rc::clone(engine);
    spawn_local(async move {
        engine.dispatch(trigger).await;
    });
}

fn listen_lifecycle(engine: &Rc<BackgroundEngine>) {
    let on_installed = {
        let engine = Rc::clone(engine);
        Closure::wrap(Box::new(move |_details: JsValue| {
            run(&engine, Trigger::Startup);
        }) as Box<dyn FnMut(JsValue)>)
    };
    browser::addInstalledListener(on_installed.as_ref().unchecked_ref());
    on_installed.forget();

    let on_startup = {
        let engine = Rc::clone(engine);
        Closure::wrap(Box::new(move || {
            run(&engine, Trigger::Startup);
        }) as Box<dyn FnMut()>)
    };
    browser::addStartupListener(on_startup.as_ref().unchecked_ref());
    on_startup.forget();
}

fn listen_tabs(engine: &Rc<BackgroundEngine>) {
    let on_updated = {
        let engine = Rc::clone(engine);
        Closure::wrap(Box::new(move |tab_id: i32, change_js: JsValue, tab_js: JsValue| {
            let change: TabChange = match serde_wasm_bindgen::from_value(change_js) {
                Ok(change) => change,
                Err(e) => {
                    debug!("Ignoring tab update for {}: {:?}", tab_id, e);
                    return;
                }
            };
            if !change.affects_verdict() {
                return;
            }
            match serde_wasm_bindgen::from_value::<TabInfo>(tab_js) {
                Ok(tab) => run(&engine, Trigger::TabUpdated { tab_id, change, tab }),
                Err(e) => debug!("Ignoring tab update for {}: {:?}", tab_id, e),
            }
        }) as Box<dyn FnMut(i32, JsValue, JsValue)>)
    };
    browser::addTabUpdatedListener(on_updated.as_ref().unchecked_ref());
    on_updated.forget();

    let on_created = {
        let engine = Rc::clone(engine);
        Closure::wrap(Box::new(move |tab_js: JsValue| {
            match serde_wasm_bindgen::from_value::<TabInfo>(tab_js) {
                Ok(tab) => run(&engine, Trigger::TabCreated(tab)),
                Err(e) => debug!("Ignoring created tab: {:?}", e),
            }
        }) as Box<dyn FnMut(JsValue)>)
    };
    browser::addTabCreatedListener(on_created.as_ref().unchecked_ref());
    on_created.forget();
}

fn listen_storage(engine: &Rc<BackgroundEngine>) {
    let on_changed = {
        let engine = Rc::clone(engine);
        Closure::wrap(Box::new(move |changes_js: JsValue, area: String| {
            let changes: StorageChanges =
                serde_wasm_bindgen::from_value(changes_js).unwrap_or_else(|e| {
                    debug!("Unreadable storage change in {}: {:?}", area, e);
                    HashMap::new()
                });
            run(&engine, Trigger::StorageChanged { area, changes });
        }) as Box<dyn FnMut(JsValue, String)>)
    };
    browser::addStorageChangedListener(on_changed.as_ref().unchecked_ref());
    on_changed.forget();
}

fn listen_messages(engine: &Rc<BackgroundEngine>) {
    let on_message = {
        let engine = Rc::clone(engine);
        Closure::wrap(Box::new(move |message_js: JsValue| -> JsValue {
            let message = serde_wasm_bindgen::from_value::<Value>(message_js)
                .ok()
                .and_then(|value| Message::parse(&value));
            let Some(message) = message else {
                // Not ours; let other listeners answer
                return JsValue::UNDEFINED;
            };

            let engine = Rc::clone(&engine);
            future_to_promise(async move {
                let report = match engine.dispatch(Trigger::Message(message)).await {
                    Some(Dispatched::All(report)) => report,
                    _ => ReconcileReport::default(),
                };
                to_js(&report).map_err(|e| JsValue::from_str(&e))
            })
            .into()
        }) as Box<dyn FnMut(JsValue) -> JsValue>)
    };
    browser::addMessageListener(on_message.as_ref().unchecked_ref());
    on_message.forget();
}
