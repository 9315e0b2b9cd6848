/// Whole-browser pass: merge duplicate groups, then route every tab
use crate::consolidate::consolidate_window;
use crate::directory::GroupDirectory;
use crate::host::TabHost;
use crate::organizer::Organizer;
use crate::router::RouteOutcome;
use crate::tab_data::{Tab, Window};
use log::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Completed { windows: usize, routed: usize },
    /// Another pass was already running
    AlreadyRunning,
    Failed,
}

/// Strip order, except the active tab goes last so its group is the one left open
fn routing_order(mut tabs: Vec<Tab>) -> Vec<Tab> {
    tabs.sort_by_key(|tab| tab.active);
    tabs
}

impl<H: TabHost> Organizer<H> {
    /// Consolidate and route every window. Re-entrant calls return
    /// [`BulkOutcome::AlreadyRunning`] without doing anything.
    pub async fn organize_all(&self) -> BulkOutcome {
        let Some(_flight) = self.state.bulk.try_begin() else {
            debug!("bulk pass already running");
            return BulkOutcome::AlreadyRunning;
        };

        let windows = match self.host.windows().await {
            Ok(windows) => windows,
            Err(err) => {
                error!("bulk pass: could not list windows: {err}");
                return BulkOutcome::Failed;
            }
        };

        let window_count = windows.len();
        let mut routed = 0;
        for window in windows {
            routed += self.organize_window(window).await;
        }

        info!("bulk pass: organized {routed} tabs across {window_count} windows");
        BulkOutcome::Completed {
            windows: window_count,
            routed,
        }
    }

    async fn organize_window(&self, window: Window) -> usize {
        consolidate_window(&self.host, window.id).await;

        let directory = match GroupDirectory::snapshot(&self.host, window.id).await {
            Ok(directory) => directory,
            Err(err) => {
                warn!("bulk pass: window {} without group cache: {err}", window.id);
                GroupDirectory::live()
            }
        };

        let mut routed = 0;
        for tab in routing_order(window.tabs) {
            match self.route_tab(&tab, &directory).await {
                RouteOutcome::Skipped | RouteOutcome::Failed => {}
                _ => routed += 1,
            }
        }
        routed
    }
}
