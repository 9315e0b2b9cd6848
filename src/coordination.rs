/// Ordering state shared by the router and the bulk pass
///
/// The extension runs on a single thread, so the state lives in `Cell`/`RefCell`
/// and is never borrowed across an `.await`.
use crate::domain::GroupKey;
use crate::tab_data::WindowId;
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

/// Identifies one routing chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainKey {
    pub window_id: WindowId,
    pub key: GroupKey,
}

impl ChainKey {
    pub fn new(window_id: WindowId, key: &GroupKey) -> ChainKey {
        ChainKey {
            window_id,
            key: key.clone(),
        }
    }
}

/// Resolves once every link appended so far has settled
type Tail = Shared<LocalBoxFuture<'static, ()>>;

/// Runs operations one at a time per key, in submission order
pub struct KeyedSerializer<K> {
    chains: RefCell<HashMap<K, Tail>>,
}

impl<K> Default for KeyedSerializer<K> {
    fn default() -> Self {
        KeyedSerializer {
            chains: RefCell::new(HashMap::new()),
        }
    }
}

/// Marks one link as settled when dropped, whether the operation finished or not
struct Link<'a, K: Eq + Hash> {
    owner: &'a KeyedSerializer<K>,
    key: K,
    done: Option<oneshot::Sender<()>>,
}

impl<K: Eq + Hash> Drop for Link<'_, K> {
    fn drop(&mut self) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        // Links still waiting behind this one keep the entry alive
        let mut chains = self.owner.chains.borrow_mut();
        let settled = chains
            .get(&self.key)
            .is_some_and(|tail| tail.clone().now_or_never().is_some());
        if settled {
            chains.remove(&self.key);
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedSerializer<K> {
    /// Run `op` after every earlier operation on `key` has settled
    ///
    /// The link is appended synchronously on the first poll, so of two calls
    /// polled back to back the first always runs first. A link dropped while
    /// waiting still holds back its successors until its own predecessors finish.
    pub async fn run<T>(&self, key: K, op: impl Future<Output = T>) -> T {
        let (done, settled) = oneshot::channel::<()>();

        let previous = self.chains.borrow().get(&key).cloned();
        let before = previous.clone();
        let tail = async move {
            if let Some(before) = before {
                before.await;
            }
            // A cancelled link counts as settled
            let _ = settled.await;
        }
        .boxed_local()
        .shared();
        self.chains.borrow_mut().insert(key.clone(), tail);

        let _link = Link {
            owner: self,
            key,
            done: Some(done),
        };

        if let Some(previous) = previous {
            previous.await;
        }
        op.await
    }

    /// Number of keys with work queued or running
    pub fn pending(&self) -> usize {
        self.chains.borrow().len()
    }
}

/// At most one holder at a time; later callers are turned away, not queued
#[derive(Default)]
pub struct SingleFlight {
    active: Cell<bool>,
}

pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.active.set(false);
    }
}

impl SingleFlight {
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        if self.active.replace(true) {
            return None;
        }
        Some(FlightGuard { flight: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Everything that must be empty once no work is pending
#[derive(Default)]
pub struct CoordinationState {
    /// Routing work per (window, key)
    pub chains: KeyedSerializer<ChainKey>,
    /// Focus passes per window, so two passes never interleave their updates
    pub focus: KeyedSerializer<WindowId>,
    pub bulk: SingleFlight,
}

impl CoordinationState {
    pub fn new() -> CoordinationState {
        CoordinationState::default()
    }

    pub fn is_idle(&self) -> bool {
        self.chains.pending() == 0 && self.focus.pending() == 0 && !self.bulk.is_active()
    }
}
