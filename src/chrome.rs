/// `TabHost` backed by the real chrome.* APIs through background.js
use crate::host::{GroupQuery, GroupUpdate, HostError, TabHost};
use crate::settings::{SETTINGS_KEY, Settings};
use crate::tab_data::{GroupId, Tab, TabGroup, TabId, Window, WindowId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryWindows() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryGroups(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getGroup(group_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn groupTabs(window_id: i32, tab_ids: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn addTabsToGroup(group_id: i32, tab_ids: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateGroup(group_id: i32, props: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveGroup(group_id: i32, index: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryGroupTabs(group_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getSyncStorage(key: &str) -> Result<JsValue, JsValue>;

    pub(crate) fn onInstalled(callback: &js_sys::Function);
    pub(crate) fn onStartup(callback: &js_sys::Function);
    pub(crate) fn onTabCreated(callback: &js_sys::Function);
    pub(crate) fn onTabUpdated(callback: &js_sys::Function);
    pub(crate) fn onTabActivated(callback: &js_sys::Function);
}

fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn call_failed(op: &'static str) -> impl FnOnce(JsValue) -> HostError {
    move |err| HostError::Call {
        op,
        message: describe(&err),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    what: &'static str,
    value: JsValue,
) -> Result<T, HostError> {
    serde_wasm_bindgen::from_value(value).map_err(|err| HostError::Decode {
        what,
        message: err.to_string(),
    })
}

fn encode<T: Serialize + ?Sized>(what: &'static str, value: &T) -> Result<JsValue, HostError> {
    serde_wasm_bindgen::to_value(value).map_err(|err| HostError::Decode {
        what,
        message: err.to_string(),
    })
}

/// Read settings from chrome.storage.sync; an absent entry means defaults
pub async fn load_settings() -> Result<Settings, HostError> {
    let stored = getSyncStorage(SETTINGS_KEY)
        .await
        .map_err(call_failed("storage.sync.get"))?;

    if stored.is_null() || stored.is_undefined() {
        return Ok(Settings::default());
    }
    decode("settings", stored)
}

// chrome.tabGroups.move index meaning "after everything else"
const END_OF_STRIP: i32 = -1;

pub struct ChromeHost;

impl TabHost for ChromeHost {
    async fn windows(&self) -> Result<Vec<Window>, HostError> {
        let windows = queryWindows()
            .await
            .map_err(call_failed("windows.getAll"))?;
        decode("windows", windows)
    }

    async fn groups(&self, query: &GroupQuery) -> Result<Vec<TabGroup>, HostError> {
        let groups = queryGroups(encode("group query", query)?)
            .await
            .map_err(call_failed("tabGroups.query"))?;
        decode("groups", groups)
    }

    async fn group(&self, group_id: GroupId) -> Result<TabGroup, HostError> {
        let group = getGroup(group_id)
            .await
            .map_err(|_| HostError::GroupNotFound(group_id))?;
        decode("group", group)
    }

    async fn tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        let tab = getTab(tab_id)
            .await
            .map_err(|_| HostError::TabNotFound(tab_id))?;
        decode("tab", tab)
    }

    async fn create_group(
        &self,
        window_id: WindowId,
        tab_ids: &[TabId],
    ) -> Result<GroupId, HostError> {
        let group_id = groupTabs(window_id, encode("tab ids", tab_ids)?)
            .await
            .map_err(call_failed("tabs.group"))?;
        decode("group id", group_id)
    }

    async fn add_to_group(&self, group_id: GroupId, tab_ids: &[TabId]) -> Result<(), HostError> {
        addTabsToGroup(group_id, encode("tab ids", tab_ids)?)
            .await
            .map_err(call_failed("tabs.group"))?;
        Ok(())
    }

    async fn update_group(
        &self,
        group_id: GroupId,
        update: &GroupUpdate,
    ) -> Result<TabGroup, HostError> {
        let group = updateGroup(group_id, encode("group update", update)?)
            .await
            .map_err(call_failed("tabGroups.update"))?;
        decode("group", group)
    }

    async fn move_group(&self, group_id: GroupId) -> Result<(), HostError> {
        moveGroup(group_id, END_OF_STRIP)
            .await
            .map_err(call_failed("tabGroups.move"))?;
        Ok(())
    }

    async fn tabs_in_group(&self, group_id: GroupId) -> Result<Vec<Tab>, HostError> {
        let tabs = queryGroupTabs(group_id)
            .await
            .map_err(call_failed("tabs.query"))?;
        decode("tabs", tabs)
    }
}
