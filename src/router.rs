/// Tab routing: put a tab into the group for its key, creating the group if needed
use crate::coordination::ChainKey;
use crate::directory::GroupDirectory;
use crate::domain::GroupKey;
use crate::host::{GroupUpdate, HostError, TabHost};
use crate::organizer::Organizer;
use crate::tab_data::{GroupId, Tab};
use log::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// No key for this tab; nothing was touched
    Skipped,
    /// The tab was already in the right group
    AlreadyGrouped(GroupId),
    Joined(GroupId),
    Created(GroupId),
    Failed,
}

impl RouteOutcome {
    pub fn group_id(self) -> Option<GroupId> {
        match self {
            RouteOutcome::AlreadyGrouped(id)
            | RouteOutcome::Joined(id)
            | RouteOutcome::Created(id) => Some(id),
            RouteOutcome::Skipped | RouteOutcome::Failed => None,
        }
    }
}

impl<H: TabHost> Organizer<H> {
    /// Route one tab snapshot. Never fails; host errors are logged and end this attempt.
    pub async fn route_tab(&self, tab: &Tab, directory: &GroupDirectory) -> RouteOutcome {
        let Some(key) = self.key_for(tab) else {
            return RouteOutcome::Skipped;
        };

        if let Some(group_id) = tab.group_id {
            match self.host.group(group_id).await {
                Ok(group) if group.has_title(key.as_str()) => {
                    self.focus(tab.window_id, group_id).await;
                    return RouteOutcome::AlreadyGrouped(group_id);
                }
                Ok(_) => {}
                Err(err) => debug!("tab {}: group {group_id} unavailable ({err})", tab.id),
            }
        }

        let chain = ChainKey::new(tab.window_id, &key);
        match self.state.chains.run(chain, self.place(tab, &key, directory)).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("tab {}: routing to {key} abandoned: {err}", tab.id);
                RouteOutcome::Failed
            }
        }
    }

    /// Join or create the group for `key`, then focus it. Runs inside the key's chain.
    async fn place(
        &self,
        tab: &Tab,
        key: &GroupKey,
        directory: &GroupDirectory,
    ) -> Result<RouteOutcome, HostError> {
        let outcome = match directory.find(&self.host, tab.window_id, key).await? {
            Some(group) => {
                self.host.add_to_group(group.id, &[tab.id]).await?;
                debug!("tab {}: joined group {} ({key})", tab.id, group.id);
                RouteOutcome::Joined(group.id)
            }
            None => {
                let group_id = self.host.create_group(tab.window_id, &[tab.id]).await?;
                let group = self
                    .host
                    .update_group(group_id, &GroupUpdate::new_group(key.as_str()))
                    .await?;
                debug!("tab {}: created group {group_id} ({key})", tab.id);
                directory.record(group);
                RouteOutcome::Created(group_id)
            }
        };

        if let Some(group_id) = outcome.group_id() {
            self.focus(tab.window_id, group_id).await;
        }
        Ok(outcome)
    }
}
