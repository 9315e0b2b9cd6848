/// The browser capabilities the grouping core relies on
///
/// Every call is asynchronous and may fail independently; nothing here is
/// atomic across calls, and other event handlers may run at any `.await`.
use crate::tab_data::{GroupId, Tab, TabGroup, TabId, Window, WindowId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("tab group {0} no longer exists")]
    GroupNotFound(GroupId),
    #[error("tab {0} no longer exists")]
    TabNotFound(TabId),
    #[error("{op} failed: {message}")]
    Call { op: &'static str, message: String },
    #[error("could not decode {what}: {message}")]
    Decode { what: &'static str, message: String },
}

/// Filter for `chrome.tabGroups.query`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroupQuery {
    pub fn in_window(window_id: WindowId) -> GroupQuery {
        GroupQuery {
            window_id: Some(window_id),
            title: None,
        }
    }

    pub fn titled(mut self, title: &str) -> GroupQuery {
        self.title = Some(title.to_string());
        self
    }

    pub fn matches(&self, group: &TabGroup) -> bool {
        self.window_id.is_none_or(|id| id == group.window_id)
            && self.title.as_deref().is_none_or(|title| group.has_title(title))
    }
}

/// Properties for `chrome.tabGroups.update`; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl GroupUpdate {
    pub fn collapsed() -> GroupUpdate {
        GroupUpdate {
            collapsed: Some(true),
            ..GroupUpdate::default()
        }
    }

    pub fn expanded() -> GroupUpdate {
        GroupUpdate {
            collapsed: Some(false),
            ..GroupUpdate::default()
        }
    }

    /// New groups get their title and start out collapsed
    pub fn new_group(title: &str) -> GroupUpdate {
        GroupUpdate {
            title: Some(title.to_string()),
            collapsed: Some(true),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// Every normal window, each with its tabs
    async fn windows(&self) -> Result<Vec<Window>, HostError>;

    async fn groups(&self, query: &GroupQuery) -> Result<Vec<TabGroup>, HostError>;

    /// Fails with [`HostError::GroupNotFound`] once the group is gone
    async fn group(&self, group_id: GroupId) -> Result<TabGroup, HostError>;

    async fn tab(&self, tab_id: TabId) -> Result<Tab, HostError>;

    /// Creates a group holding exactly `tab_ids`, returning its id
    async fn create_group(
        &self,
        window_id: WindowId,
        tab_ids: &[TabId],
    ) -> Result<GroupId, HostError>;

    /// Moves `tab_ids` into an existing group, out of whatever group they were in
    async fn add_to_group(&self, group_id: GroupId, tab_ids: &[TabId]) -> Result<(), HostError>;

    async fn update_group(
        &self,
        group_id: GroupId,
        update: &GroupUpdate,
    ) -> Result<TabGroup, HostError>;

    /// Moves the group after every other tab in its window
    async fn move_group(&self, group_id: GroupId) -> Result<(), HostError>;

    async fn tabs_in_group(&self, group_id: GroupId) -> Result<Vec<Tab>, HostError>;
}
