//! Replicated boolean flags shared by every window.
//!
//! Each window holds its own [`SharedStateStore`]. A local `set` updates the
//! replica, notifies local observers and hands `{key, value}` to the
//! configured [`StateBroadcaster`]. Updates arriving from other windows go
//! through `apply_remote`, which never re-broadcasts.
//!
//! Consistency is last-writer-wins per key. There is no reconciliation; a
//! window that missed a broadcast recovers only through `reset` or by
//! loading a full snapshot on mount.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use polkalive_common::{Event, EventBus, SyncId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Total mapping from every [`SyncId`] to a boolean.
///
/// Deserializing a partial map fills the missing keys with `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<SyncId, bool>", into = "BTreeMap<SyncId, bool>")]
pub struct SharedState(BTreeMap<SyncId, bool>);

impl SharedState {
    /// Every key present and `false`.
    pub fn init() -> Self {
        Self(SyncId::ALL.into_iter().map(|id| (id, false)).collect())
    }

    pub fn get(&self, key: SyncId) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: SyncId, value: bool) {
        self.0.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SyncId, bool)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::init()
    }
}

impl From<BTreeMap<SyncId, bool>> for SharedState {
    fn from(partial: BTreeMap<SyncId, bool>) -> Self {
        let mut state = Self::init();
        for (key, value) in partial {
            state.set(key, value);
        }
        state
    }
}

impl From<SharedState> for BTreeMap<SyncId, bool> {
    fn from(state: SharedState) -> Self {
        state.0
    }
}

/// Payload of a shared-state broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncUpdate {
    pub key: SyncId,
    pub value: bool,
}

/// Delivers local changes to the other windows.
///
/// Implementations are fire-and-forget: delivery failures are logged, never
/// returned, and must preserve send order for a given key.
pub trait StateBroadcaster: Send + Sync {
    fn broadcast(&self, update: SyncUpdate);
}

pub struct SharedStateStore {
    state: RwLock<SharedState>,
    broadcaster: RwLock<Option<Arc<dyn StateBroadcaster>>>,
    observers: EventBus,
}

impl SharedStateStore {
    /// A store with every key `false` and no broadcaster.
    pub fn new(observer_capacity: usize) -> Self {
        Self {
            state: RwLock::new(SharedState::init()),
            broadcaster: RwLock::new(None),
            observers: EventBus::new(observer_capacity.max(1)),
        }
    }

    pub fn with_broadcaster(observer_capacity: usize, broadcaster: Arc<dyn StateBroadcaster>) -> Self {
        let store = Self::new(observer_capacity);
        store.set_broadcaster(broadcaster);
        store
    }

    /// Fresh total mapping with every key `false`.
    pub fn init() -> SharedState {
        SharedState::init()
    }

    /// Install the broadcaster used by later `set` calls.
    pub fn set_broadcaster(&self, broadcaster: Arc<dyn StateBroadcaster>) {
        *self
            .broadcaster
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(broadcaster);
    }

    pub fn get(&self, key: SyncId) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
    }

    /// Update locally, notify observers, then broadcast to other windows.
    pub fn set(&self, key: SyncId, value: bool) {
        self.write_and_notify(key, value);

        let broadcaster = self
            .broadcaster
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match broadcaster {
            Some(b) => b.broadcast(SyncUpdate { key, value }),
            None => debug!(%key, "no broadcaster installed, change stays local"),
        }
    }

    /// Apply an update received from another window. Never re-broadcasts.
    pub fn apply_remote(&self, update: SyncUpdate) {
        debug!(key = %update.key, value = update.value, "remote update");
        self.write_and_notify(update.key, update.value);
    }

    /// Every key back to `false`. Local only.
    pub fn reset(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = SharedState::init();
        self.observers.publish(Event::SharedStateReset);
    }

    /// Replace the whole replica, e.g. with the snapshot fetched on mount.
    /// Observers hear about every key whose value changed.
    pub fn load_snapshot(&self, snapshot: SharedState) {
        let changed: Vec<(SyncId, bool)> = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let changed = snapshot
                .iter()
                .filter(|(k, v)| state.get(*k) != *v)
                .collect();
            *state = snapshot;
            changed
        };
        for (key, value) in changed {
            self.observers
                .publish(Event::SharedStateChanged { key, value });
        }
    }

    pub fn snapshot(&self) -> SharedState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Observe [`Event::SharedStateChanged`] and [`Event::SharedStateReset`].
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.observers.subscribe()
    }

    fn write_and_notify(&self, key: SyncId, value: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(key, value);
        self.observers
            .publish(Event::SharedStateChanged { key, value });
    }
}

impl Default for SharedStateStore {
    fn default() -> Self {
        Self::new(64)
    }
}
