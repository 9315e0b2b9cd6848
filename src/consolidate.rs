/// Merge groups that share a title within one window
use crate::host::{GroupQuery, HostError, TabHost};
use crate::tab_data::{TabGroup, TabId, WindowId};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Bucket groups by title, in listing order; untitled groups are ignored
fn duplicate_buckets(groups: &[TabGroup]) -> Vec<Vec<&TabGroup>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&TabGroup>> = Vec::new();

    for group in groups {
        let Some(title) = group.title.as_deref().filter(|title| !title.is_empty()) else {
            continue;
        };
        match index.get(title) {
            Some(&at) => buckets[at].push(group),
            None => {
                index.insert(title, buckets.len());
                buckets.push(vec![group]);
            }
        }
    }

    buckets.retain(|bucket| bucket.len() > 1);
    buckets
}

async fn merge_into<H: TabHost>(
    host: &H,
    canonical: &TabGroup,
    duplicate: &TabGroup,
) -> Result<usize, HostError> {
    let tab_ids: Vec<TabId> = host
        .tabs_in_group(duplicate.id)
        .await?
        .iter()
        .map(|tab| tab.id)
        .collect();
    if tab_ids.is_empty() {
        return Ok(0);
    }
    host.add_to_group(canonical.id, &tab_ids).await?;
    Ok(tab_ids.len())
}

/// Move the tabs of every duplicate group into the first-listed group with the
/// same title, returning how many tabs moved
///
/// Emptied groups are left for the host to remove. A failing duplicate is
/// logged and skipped.
pub async fn consolidate_window<H: TabHost>(host: &H, window_id: WindowId) -> usize {
    let groups = match host.groups(&GroupQuery::in_window(window_id)).await {
        Ok(groups) => groups,
        Err(err) => {
            warn!("consolidate: could not list groups of window {window_id}: {err}");
            return 0;
        }
    };

    let mut moved = 0;
    for bucket in duplicate_buckets(&groups) {
        let (canonical, duplicates) = (bucket[0], &bucket[1..]);
        for duplicate in duplicates {
            match merge_into(host, canonical, duplicate).await {
                Ok(count) => {
                    debug!(
                        "consolidate: moved {count} tabs from group {} into {}",
                        duplicate.id, canonical.id
                    );
                    moved += count;
                }
                Err(err) => warn!(
                    "consolidate: skipping duplicate group {} of {}: {err}",
                    duplicate.id, canonical.id
                ),
            }
        }
    }

    if moved > 0 {
        info!("consolidate: window {window_id}: merged {moved} tabs into existing groups");
    }
    moved
}
