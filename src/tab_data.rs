/// Data structures for Tab Grouper, shaped like the Chrome extension API objects
use serde::{Deserialize, Deserializer, Serialize};

pub type TabId = i32;
pub type WindowId = i32;
pub type GroupId = i32;

/// Chrome reports ungrouped tabs with `groupId == -1`
fn group_membership<'de, D>(deserializer: D) -> Result<Option<GroupId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<GroupId>::deserialize(deserializer)?.filter(|id| *id >= 0))
}

/// A browser tab as last seen by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pending_url: Option<String>,
    #[serde(default, deserialize_with = "group_membership")]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
}

impl Tab {
    pub fn new(id: TabId, window_id: WindowId, url: &str) -> Tab {
        Tab {
            id,
            window_id,
            url: Some(url.to_string()),
            pending_url: None,
            group_id: None,
            active: false,
            pinned: false,
        }
    }

    /// The committed URL, or the one still loading for a fresh tab
    pub fn effective_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or(self.pending_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// A tab group within one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: GroupId,
    pub window_id: WindowId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
}

impl TabGroup {
    pub fn has_title(&self, title: &str) -> bool {
        self.title.as_deref() == Some(title)
    }
}

/// A top-level browser window with its tabs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Complete,
    Unloaded,
}

/// The `changeInfo` of a tab update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChange {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<LoadStatus>,
}

/// The `activeInfo` of a tab activation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
    pub tab_id: TabId,
    pub window_id: WindowId,
}
