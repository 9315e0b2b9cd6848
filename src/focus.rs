/// Keep one group open: expand it, move it to the end, collapse the rest
use crate::host::{GroupQuery, GroupUpdate, HostError, TabHost};
use crate::organizer::Organizer;
use crate::tab_data::{GroupId, WindowId};
use futures::future::{FutureExt, LocalBoxFuture, join_all};
use log::{debug, warn};

type Request<'a> = LocalBoxFuture<'a, (GroupId, &'static str, Result<(), HostError>)>;

/// Expand `keep`, move it to the end of the strip and collapse every other group
/// in the window
///
/// All updates go out at once and every one is awaited, so one failing group
/// never stops the others. Failures are logged, not returned.
pub async fn focus_group<H: TabHost>(host: &H, window_id: WindowId, keep: GroupId) {
    let groups = match host.groups(&GroupQuery::in_window(window_id)).await {
        Ok(groups) => groups,
        Err(err) => {
            warn!("focus: could not list groups of window {window_id}: {err}");
            return;
        }
    };

    if !groups.iter().any(|group| group.id == keep) {
        debug!("focus: group {keep} is no longer in window {window_id}");
    }

    let mut requests: Vec<Request<'_>> = Vec::new();
    for group in &groups {
        let id = group.id;
        if id == keep {
            if group.collapsed {
                requests.push(
                    async move {
                        let result = host.update_group(id, &GroupUpdate::expanded()).await;
                        (id, "expand", result.map(drop))
                    }
                    .boxed_local(),
                );
            }
            requests.push(async move { (id, "move", host.move_group(id).await) }.boxed_local());
        } else if !group.collapsed {
            requests.push(
                async move {
                    let result = host.update_group(id, &GroupUpdate::collapsed()).await;
                    (id, "collapse", result.map(drop))
                }
                .boxed_local(),
            );
        }
    }

    for (id, action, result) in join_all(requests).await {
        if let Err(err) = result {
            warn!("focus: {action} of group {id} failed: {err}");
        }
    }
}

impl<H: TabHost> Organizer<H> {
    /// Focus `keep` once every earlier focus pass in the window has finished
    pub(crate) async fn focus(&self, window_id: WindowId, keep: GroupId) {
        self.state
            .focus
            .run(window_id, focus_group(&self.host, window_id, keep))
            .await
    }
}
