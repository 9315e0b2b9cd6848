/// User settings, stored in chrome.storage.sync
use log::Level;
use serde::{Deserialize, Serialize};

/// Storage key the settings object lives under
pub const SETTINGS_KEY: &str = "tab_grouper_settings";

/// What to do with pinned tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinnedTabPolicy {
    /// Group pinned tabs like any other tab
    #[default]
    Group,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub pinned_tabs: PinnedTabPolicy,
    /// Title of the group collecting new-tab pages
    pub new_tab_title: String,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            pinned_tabs: PinnedTabPolicy::Group,
            new_tab_title: "NEW TAB".to_string(),
            log_level: "info".to_string(),
        }
    }

    /// Falls back to `Info` for anything `log` does not recognize
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::Info)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
