/// Tab Grouper - Chrome Extension that keeps tabs grouped by site
/// Built with Rust + WASM

pub mod bulk;
mod chrome;
pub mod consolidate;
pub mod coordination;
pub mod directory;
pub mod domain;
pub mod events;
pub mod focus;
pub mod host;
pub mod organizer;
pub mod router;
pub mod settings;
pub mod tab_data;

#[cfg(test)]
mod testing;

pub use chrome::ChromeHost;
pub use events::{EventOutcome, TabEvent};
pub use organizer::Organizer;

use crate::chrome::decode;
use crate::settings::Settings;
use crate::tab_data::{ActiveInfo, Tab, TabChange};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use log::{info, warn};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

type Ready = Shared<LocalBoxFuture<'static, Rc<Organizer<ChromeHost>>>>;

thread_local! {
    // Settings load asynchronously; events arriving before that wait on this
    static ORGANIZER: Ready = start_organizer().boxed_local().shared();
}

async fn start_organizer() -> Rc<Organizer<ChromeHost>> {
    let loaded = chrome::load_settings().await;
    let settings = match &loaded {
        Ok(settings) => settings.clone(),
        Err(_) => Settings::default(),
    };

    wasm_logger::init(wasm_logger::Config::new(settings.level()));
    if let Err(err) = loaded {
        warn!("using default settings: {err}");
    }
    info!("tab grouper ready: {settings:?}");

    Rc::new(Organizer::new(ChromeHost, settings))
}

fn dispatch(event: TabEvent) {
    let ready = ORGANIZER.with(|organizer| organizer.clone());
    spawn_local(async move {
        let organizer = ready.await;
        organizer.handle(event).await;
    });
}

fn decode_or_log<T: serde::de::DeserializeOwned>(what: &'static str, value: JsValue) -> Option<T> {
    decode(what, value)
        .map_err(|err| warn!("ignoring event: {err}"))
        .ok()
}

// Listeners must be attached synchronously while the service worker starts,
// or Chrome will not deliver the event that woke it
fn register_listeners() {
    let installed = Closure::wrap(Box::new(move |_details: JsValue| {
        dispatch(TabEvent::Installed);
    }) as Box<dyn Fn(JsValue)>);
    chrome::onInstalled(installed.as_ref().unchecked_ref());
    installed.forget();

    let startup = Closure::wrap(Box::new(move || {
        dispatch(TabEvent::Startup);
    }) as Box<dyn Fn()>);
    chrome::onStartup(startup.as_ref().unchecked_ref());
    startup.forget();

    let created = Closure::wrap(Box::new(move |tab: JsValue| {
        if let Some(tab) = decode_or_log::<Tab>("created tab", tab) {
            dispatch(TabEvent::Created(tab));
        }
    }) as Box<dyn Fn(JsValue)>);
    chrome::onTabCreated(created.as_ref().unchecked_ref());
    created.forget();

    let updated = Closure::wrap(Box::new(
        move |_tab_id: JsValue, change: JsValue, tab: JsValue| {
            let change = decode_or_log::<TabChange>("tab change", change);
            let tab = decode_or_log::<Tab>("updated tab", tab);
            if let (Some(tab), Some(change)) = (tab, change) {
                dispatch(TabEvent::Updated { tab, change });
            }
        },
    ) as Box<dyn Fn(JsValue, JsValue, JsValue)>);
    chrome::onTabUpdated(updated.as_ref().unchecked_ref());
    updated.forget();

    let activated = Closure::wrap(Box::new(move |info: JsValue| {
        if let Some(info) = decode_or_log::<ActiveInfo>("active info", info) {
            dispatch(TabEvent::Activated(info));
        }
    }) as Box<dyn Fn(JsValue)>);
    chrome::onTabActivated(activated.as_ref().unchecked_ref());
    activated.forget();
}

// Set up panic hook and event listeners when the background worker loads
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    register_listeners();
}

// Re-export the key extractor for JavaScript access
#[wasm_bindgen]
pub fn grouping_key_for_url(url: &str) -> Option<String> {
    domain::grouping_key(Some(url), &Settings::default().new_tab_title).map(|key| key.to_string())
}
