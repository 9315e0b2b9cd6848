/// Read-through view of a window's tab groups, live or cached for one bulk pass
use crate::domain::GroupKey;
use crate::host::{GroupQuery, HostError, TabHost};
use crate::tab_data::{GroupId, TabGroup, WindowId};
use log::debug;
use std::cell::RefCell;

pub enum GroupDirectory {
    /// Always asks the host
    Live,
    /// A snapshot of one window, kept current with the groups created during the pass
    Cached {
        window_id: WindowId,
        groups: RefCell<Vec<TabGroup>>,
    },
}

impl GroupDirectory {
    pub fn live() -> GroupDirectory {
        GroupDirectory::Live
    }

    /// Query the window's groups once and serve later lookups from memory
    pub async fn snapshot<H: TabHost>(
        host: &H,
        window_id: WindowId,
    ) -> Result<GroupDirectory, HostError> {
        let groups = host.groups(&GroupQuery::in_window(window_id)).await?;
        Ok(GroupDirectory::Cached {
            window_id,
            groups: RefCell::new(groups),
        })
    }

    /// Groups matching `query`, from the snapshot when it covers the query's window
    pub async fn query<H: TabHost>(
        &self,
        host: &H,
        query: &GroupQuery,
    ) -> Result<Vec<TabGroup>, HostError> {
        match self {
            GroupDirectory::Cached { window_id, groups } if query.window_id == Some(*window_id) => {
                Ok(groups
                    .borrow()
                    .iter()
                    .filter(|group| query.matches(group))
                    .cloned()
                    .collect())
            }
            _ => host.groups(query).await,
        }
    }

    /// Find the window's group titled `key`
    ///
    /// A cached hit is re-read from the host first; if the group vanished or was
    /// renamed since the snapshot, it is dropped from the cache and treated as missing.
    pub async fn find<H: TabHost>(
        &self,
        host: &H,
        window_id: WindowId,
        key: &GroupKey,
    ) -> Result<Option<TabGroup>, HostError> {
        let query = GroupQuery::in_window(window_id).titled(key.as_str());
        // The host may match titles loosely; only an exact title counts
        let candidate = self
            .query(host, &query)
            .await?
            .into_iter()
            .find(|group| group.has_title(key.as_str()));

        let Some(candidate) = candidate else {
            return Ok(None);
        };
        if !self.is_cached_for(window_id) {
            return Ok(Some(candidate));
        }

        match host.group(candidate.id).await {
            Ok(group) if group.has_title(key.as_str()) => Ok(Some(group)),
            Ok(_) | Err(HostError::GroupNotFound(_)) => {
                debug!("cached group {} for {key} is stale", candidate.id);
                self.forget(candidate.id);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Make a group created during the pass visible to later lookups
    pub fn record(&self, group: TabGroup) {
        if let GroupDirectory::Cached { window_id, groups } = self {
            if *window_id == group.window_id {
                let mut groups = groups.borrow_mut();
                groups.retain(|known| known.id != group.id);
                groups.push(group);
            }
        }
    }

    fn forget(&self, group_id: GroupId) {
        if let GroupDirectory::Cached { groups, .. } = self {
            groups.borrow_mut().retain(|group| group.id != group_id);
        }
    }

    fn is_cached_for(&self, window_id: WindowId) -> bool {
        matches!(self, GroupDirectory::Cached { window_id: cached, .. } if *cached == window_id)
    }
}
