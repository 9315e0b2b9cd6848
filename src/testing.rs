/// In-memory browser used by the coordination tests
///
/// Every host call yields to the executor once before touching state, so
/// futures joined together interleave at each call the way Chrome callbacks do.
use crate::host::{GroupQuery, GroupUpdate, HostError, TabHost};
use crate::tab_data::{GroupId, Tab, TabGroup, TabId, Window, WindowId};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub fn yield_now() -> impl Future<Output = ()> {
    YieldNow(false)
}

#[derive(Default)]
struct World {
    tabs: Vec<Tab>,
    groups: Vec<TabGroup>,
    next_group_id: GroupId,
}

impl World {
    /// Chrome drops a group as soon as its last tab leaves
    fn prune(&mut self) {
        let tabs = &self.tabs;
        self.groups
            .retain(|group| tabs.iter().any(|tab| tab.group_id == Some(group.id)));
    }
}

#[derive(Default)]
pub struct FakeHost {
    world: RefCell<World>,
    calls: RefCell<Vec<(&'static str, i32)>>,
    failures: RefCell<Vec<(&'static str, i32)>>,
    queries: RefCell<Vec<GroupQuery>>,
}

impl FakeHost {
    pub fn new() -> FakeHost {
        let host = FakeHost::default();
        host.world.borrow_mut().next_group_id = 100;
        host
    }

    pub fn open_tab(&self, id: TabId, window_id: WindowId, url: &str) -> Tab {
        let tab = Tab::new(id, window_id, url);
        self.world.borrow_mut().tabs.push(tab.clone());
        tab
    }

    /// Adds a group directly, bypassing the call log
    pub fn add_group(
        &self,
        window_id: WindowId,
        title: &str,
        collapsed: bool,
        tab_ids: &[TabId],
    ) -> GroupId {
        let mut world = self.world.borrow_mut();
        let id = world.next_group_id;
        world.next_group_id += 1;
        world.groups.push(TabGroup {
            id,
            window_id,
            title: Some(title.to_string()),
            collapsed,
        });
        for tab in world.tabs.iter_mut().filter(|tab| tab_ids.contains(&tab.id)) {
            tab.group_id = Some(id);
        }
        id
    }

    pub fn set_active(&self, tab_id: TabId) {
        for tab in self.world.borrow_mut().tabs.iter_mut() {
            tab.active = tab.id == tab_id;
        }
    }

    pub fn set_pinned(&self, tab_id: TabId) {
        for tab in self.world.borrow_mut().tabs.iter_mut() {
            if tab.id == tab_id {
                tab.pinned = true;
            }
        }
    }

    pub fn snapshot(&self, tab_id: TabId) -> Tab {
        self.world
            .borrow()
            .tabs
            .iter()
            .find(|tab| tab.id == tab_id)
            .cloned()
            .unwrap_or_else(|| panic!("no tab {tab_id}"))
    }

    pub fn groups_in(&self, window_id: WindowId) -> Vec<TabGroup> {
        self.world
            .borrow()
            .groups
            .iter()
            .filter(|group| group.window_id == window_id)
            .cloned()
            .collect()
    }

    pub fn groups_titled(&self, window_id: WindowId, title: &str) -> Vec<TabGroup> {
        self.groups_in(window_id)
            .into_iter()
            .filter(|group| group.has_title(title))
            .collect()
    }

    pub fn expanded_in(&self, window_id: WindowId) -> Vec<GroupId> {
        self.groups_in(window_id)
            .into_iter()
            .filter(|group| !group.collapsed)
            .map(|group| group.id)
            .collect()
    }

    pub fn members(&self, group_id: GroupId) -> Vec<TabId> {
        self.world
            .borrow()
            .tabs
            .iter()
            .filter(|tab| tab.group_id == Some(group_id))
            .map(|tab| tab.id)
            .collect()
    }

    /// Remove a group without the host noticing its tabs, like a closed saved group
    pub fn drop_group(&self, group_id: GroupId) {
        let mut world = self.world.borrow_mut();
        for tab in world.tabs.iter_mut() {
            if tab.group_id == Some(group_id) {
                tab.group_id = None;
            }
        }
        world.groups.retain(|group| group.id != group_id);
    }

    pub fn rename_group(&self, group_id: GroupId, title: &str) {
        for group in self.world.borrow_mut().groups.iter_mut() {
            if group.id == group_id {
                group.title = Some(title.to_string());
            }
        }
    }

    /// Make every `op` call on `id` fail (use 0 for calls without an id)
    pub fn fail(&self, op: &'static str, id: i32) {
        self.failures.borrow_mut().push((op, id));
    }

    pub fn last_query(&self) -> Option<GroupQuery> {
        self.queries.borrow().last().cloned()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.borrow().iter().filter(|(name, _)| *name == op).count()
    }

    async fn enter(&self, op: &'static str, id: i32) -> Result<(), HostError> {
        yield_now().await;
        self.calls.borrow_mut().push((op, id));
        if self.failures.borrow().contains(&(op, id)) {
            return Err(HostError::Call {
                op,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl TabHost for FakeHost {
    async fn windows(&self) -> Result<Vec<Window>, HostError> {
        self.enter("windows", 0).await?;
        let world = self.world.borrow();
        let mut ids: Vec<WindowId> = world.tabs.iter().map(|tab| tab.window_id).collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(ids
            .into_iter()
            .map(|id| Window {
                id,
                focused: false,
                tabs: world
                    .tabs
                    .iter()
                    .filter(|tab| tab.window_id == id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn groups(&self, query: &GroupQuery) -> Result<Vec<TabGroup>, HostError> {
        self.enter("groups", query.window_id.unwrap_or(0)).await?;
        self.queries.borrow_mut().push(query.clone());
        Ok(self
            .world
            .borrow()
            .groups
            .iter()
            .filter(|group| query.matches(group))
            .cloned()
            .collect())
    }

    async fn group(&self, group_id: GroupId) -> Result<TabGroup, HostError> {
        self.enter("group", group_id).await?;
        self.world
            .borrow()
            .groups
            .iter()
            .find(|group| group.id == group_id)
            .cloned()
            .ok_or(HostError::GroupNotFound(group_id))
    }

    async fn tab(&self, tab_id: TabId) -> Result<Tab, HostError> {
        self.enter("tab", tab_id).await?;
        self.world
            .borrow()
            .tabs
            .iter()
            .find(|tab| tab.id == tab_id)
            .cloned()
            .ok_or(HostError::TabNotFound(tab_id))
    }

    async fn create_group(
        &self,
        window_id: WindowId,
        tab_ids: &[TabId],
    ) -> Result<GroupId, HostError> {
        self.enter("create_group", window_id).await?;
        let mut world = self.world.borrow_mut();
        let id = world.next_group_id;
        world.next_group_id += 1;
        world.groups.push(TabGroup {
            id,
            window_id,
            title: None,
            collapsed: false,
        });
        for tab in world.tabs.iter_mut().filter(|tab| tab_ids.contains(&tab.id)) {
            tab.group_id = Some(id);
        }
        world.prune();
        Ok(id)
    }

    async fn add_to_group(&self, group_id: GroupId, tab_ids: &[TabId]) -> Result<(), HostError> {
        self.enter("add_to_group", group_id).await?;
        let mut world = self.world.borrow_mut();
        if !world.groups.iter().any(|group| group.id == group_id) {
            return Err(HostError::GroupNotFound(group_id));
        }
        for tab in world.tabs.iter_mut().filter(|tab| tab_ids.contains(&tab.id)) {
            tab.group_id = Some(group_id);
        }
        world.prune();
        Ok(())
    }

    async fn update_group(
        &self,
        group_id: GroupId,
        update: &GroupUpdate,
    ) -> Result<TabGroup, HostError> {
        self.enter("update_group", group_id).await?;
        let mut world = self.world.borrow_mut();
        let group = world
            .groups
            .iter_mut()
            .find(|group| group.id == group_id)
            .ok_or(HostError::GroupNotFound(group_id))?;
        if let Some(title) = &update.title {
            group.title = Some(title.clone());
        }
        if let Some(collapsed) = update.collapsed {
            group.collapsed = collapsed;
        }
        Ok(group.clone())
    }

    async fn move_group(&self, group_id: GroupId) -> Result<(), HostError> {
        self.enter("move_group", group_id).await?;
        let mut world = self.world.borrow_mut();
        let index = world
            .groups
            .iter()
            .position(|group| group.id == group_id)
            .ok_or(HostError::GroupNotFound(group_id))?;
        let group = world.groups.remove(index);
        world.groups.push(group);
        Ok(())
    }

    async fn tabs_in_group(&self, group_id: GroupId) -> Result<Vec<Tab>, HostError> {
        self.enter("tabs_in_group", group_id).await?;
        Ok(self
            .world
            .borrow()
            .tabs
            .iter()
            .filter(|tab| tab.group_id == Some(group_id))
            .cloned()
            .collect())
    }
}
