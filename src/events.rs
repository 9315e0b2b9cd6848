/// Browser events and what each one triggers
use crate::bulk::BulkOutcome;
use crate::directory::GroupDirectory;
use crate::host::TabHost;
use crate::organizer::Organizer;
use crate::router::RouteOutcome;
use crate::tab_data::{ActiveInfo, LoadStatus, Tab, TabChange};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    /// Extension installed or updated
    Installed,
    /// Browser started with the extension enabled
    Startup,
    Created(Tab),
    Updated { tab: Tab, change: TabChange },
    Activated(ActiveInfo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Bulk(BulkOutcome),
    Routed(RouteOutcome),
    Focused,
    /// Dropped because a bulk pass is running
    Suppressed,
    Ignored,
}

impl<H: TabHost> Organizer<H> {
    /// Handle one browser event. Never fails; problems are logged.
    pub async fn handle(&self, event: TabEvent) -> EventOutcome {
        match event {
            TabEvent::Installed | TabEvent::Startup => {
                EventOutcome::Bulk(self.organize_all().await)
            }
            TabEvent::Created(tab) => {
                if self.state.bulk.is_active() {
                    debug!("tab {} created during bulk pass; left to the pass", tab.id);
                    return EventOutcome::Suppressed;
                }
                if tab.effective_url().is_none() {
                    return EventOutcome::Ignored;
                }
                EventOutcome::Routed(self.route_tab(&tab, &GroupDirectory::live()).await)
            }
            TabEvent::Updated { mut tab, change } => {
                if self.state.bulk.is_active() {
                    debug!("tab {} updated during bulk pass; left to the pass", tab.id);
                    return EventOutcome::Suppressed;
                }
                if let Some(url) = change.url {
                    tab.url = Some(url);
                } else if change.status != Some(LoadStatus::Complete) {
                    return EventOutcome::Ignored;
                }
                EventOutcome::Routed(self.route_tab(&tab, &GroupDirectory::live()).await)
            }
            TabEvent::Activated(info) => self.focus_activated(info).await,
        }
    }

    async fn focus_activated(&self, info: ActiveInfo) -> EventOutcome {
        let tab = match self.host.tab(info.tab_id).await {
            Ok(tab) => tab,
            Err(err) => {
                warn!("activated tab {} could not be read: {err}", info.tab_id);
                return EventOutcome::Ignored;
            }
        };
        match tab.group_id {
            Some(group_id) => {
                self.focus(info.window_id, group_id).await;
                EventOutcome::Focused
            }
            None => EventOutcome::Ignored,
        }
    }
}
