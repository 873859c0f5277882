//! Per-window composition of adapter, shared-state replica and task queue.
//!
//! Local changes are applied immediately and relayed through the adapter on
//! the window's [`SerialTaskQueue`], so relays leave the window in the order
//! they were made even when each relay is an awaited round trip.

use std::sync::{Arc, Mutex, PoisonError};

use polkalive_common::{IpcError, SyncId, WindowId};
use polkalive_state::{SerialTaskQueue, SharedStateStore, StateBroadcaster, SyncUpdate};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::adapter::{PlatformAdapter, Subscription};

/// Broadcasts store changes by queueing `relay_state` calls.
struct QueuedRelay {
    adapter: Arc<dyn PlatformAdapter>,
    queue: SerialTaskQueue,
}

impl StateBroadcaster for QueuedRelay {
    fn broadcast(&self, update: SyncUpdate) {
        let adapter = Arc::clone(&self.adapter);
        self.queue
            .enqueue(move || async move { adapter.relay_state(update.key, update.value).await });
    }
}

#[derive(Default)]
struct Listener {
    subscription: Option<Subscription>,
    applier: Option<JoinHandle<()>>,
}

pub struct WindowContext {
    window: WindowId,
    adapter: Arc<dyn PlatformAdapter>,
    store: Arc<SharedStateStore>,
    queue: SerialTaskQueue,
    listener: Mutex<Listener>,
}

impl WindowContext {
    pub fn new(window: WindowId, adapter: Arc<dyn PlatformAdapter>, observer_capacity: usize) -> Self {
        let queue = SerialTaskQueue::new(format!("{window}-relay"));
        let broadcaster = Arc::new(QueuedRelay {
            adapter: Arc::clone(&adapter),
            queue: queue.clone(),
        });
        Self {
            window,
            adapter,
            store: Arc::new(SharedStateStore::with_broadcaster(observer_capacity, broadcaster)),
            queue,
            listener: Mutex::new(Listener::default()),
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn adapter(&self) -> &Arc<dyn PlatformAdapter> {
        &self.adapter
    }

    pub fn store(&self) -> &Arc<SharedStateStore> {
        &self.store
    }

    pub fn queue(&self) -> &SerialTaskQueue {
        &self.queue
    }

    /// Subscribe to pushes, then load the full snapshot.
    ///
    /// Pushes that arrive while the snapshot is in flight are buffered and
    /// applied after it, in arrival order. Calling `mount` again replaces the
    /// previous subscription.
    pub async fn mount(&self) -> Result<(), IpcError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<SyncUpdate>();
        let subscription = self.adapter.listen_shared_state_on_mount(Arc::new(move |update: SyncUpdate| {
            let _ = tx.send(update);
        }));

        let snapshot = self.adapter.get_shared_state_on_mount().await?;
        self.store.load_snapshot(snapshot);

        let applier = subscription.as_ref().map(|_| {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                while let Some(update) = rx.recv().await {
                    store.apply_remote(update);
                }
            })
        });

        let live = subscription.is_some();
        let previous = std::mem::replace(
            &mut *self.listener.lock().unwrap_or_else(PoisonError::into_inner),
            Listener {
                subscription,
                applier,
            },
        );
        stop(previous);

        info!(window = %self.window, variant = ?self.adapter.variant(), live, "window mounted");
        Ok(())
    }

    /// Set `key` locally and queue the relay to the other windows.
    pub fn relay(&self, key: SyncId, value: bool) {
        debug!(window = %self.window, %key, value, "relay");
        self.store.set(key, value);
    }

    /// Reset the local replica and queue the reset for every other window.
    pub fn reset(&self) {
        debug!(window = %self.window, "reset");
        self.store.reset();
        let adapter = Arc::clone(&self.adapter);
        self.queue
            .enqueue(move || async move { adapter.reset_shared_state().await });
    }

    pub fn get(&self, key: SyncId) -> bool {
        self.store.get(key)
    }

    /// Wait until every relay queued so far has been handed to the adapter.
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    /// Whether pushes from other windows are being applied.
    pub fn is_listening(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }
}

impl Drop for WindowContext {
    fn drop(&mut self) {
        let listener = self.listener.get_mut().unwrap_or_else(PoisonError::into_inner);
        stop(std::mem::take(listener));
    }
}

fn stop(listener: Listener) {
    drop(listener.subscription);
    if let Some(applier) = listener.applier {
        applier.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AccountRecord, ActionMeta, AnalyticsEvent, StateCallback};
    use async_trait::async_trait;
    use polkalive_common::{PlatformVariant, TabId};
    use polkalive_state::SharedState;
    use serde_json::Value;
    use std::time::Duration;
    use tokio::sync::{broadcast, oneshot};

    /// In-memory adapter: records relays, serves a fixed snapshot, and pushes
    /// whatever the test sends on `pushes`.
    struct FakeAdapter {
        relays: Mutex<Vec<SyncUpdate>>,
        resets: Mutex<usize>,
        snapshot: SharedState,
        pushes: broadcast::Sender<SyncUpdate>,
        push_capable: bool,
        relay_delay: Duration,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl FakeAdapter {
        fn new(snapshot: SharedState, push_capable: bool) -> Self {
            Self {
                relays: Mutex::new(Vec::new()),
                resets: Mutex::new(0),
                snapshot,
                pushes: broadcast::channel(64).0,
                push_capable,
                relay_delay: Duration::ZERO,
                gate: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl PlatformAdapter for FakeAdapter {
        fn variant(&self) -> PlatformVariant {
            if self.push_capable {
                PlatformVariant::Direct
            } else {
                PlatformVariant::Extension
            }
        }

        async fn relay_state(&self, key: SyncId, value: bool) -> Result<(), IpcError> {
            tokio::time::sleep(self.relay_delay).await;
            self.relays.lock().unwrap().push(SyncUpdate { key, value });
            Ok(())
        }

        async fn reset_shared_state(&self) -> Result<(), IpcError> {
            *self.resets.lock().unwrap() += 1;
            Ok(())
        }

        async fn open_tab(
            &self,
            _id: &TabId,
            _data: Option<Value>,
            _analytics: Option<AnalyticsEvent>,
        ) -> Result<(), IpcError> {
            Ok(())
        }

        async fn is_tab_open(&self, _id: &TabId) -> Result<bool, IpcError> {
            Ok(false)
        }

        async fn copy_to_clipboard(&self, _text: &str) -> Result<(), IpcError> {
            Ok(())
        }

        async fn init_action(&self, _meta: ActionMeta) -> Result<(), IpcError> {
            Ok(())
        }

        async fn get_shared_state_on_mount(&self) -> Result<SharedState, IpcError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(self.snapshot.clone())
        }

        fn listen_shared_state_on_mount(&self, on_change: StateCallback) -> Option<Subscription> {
            if !self.push_capable {
                return None;
            }
            let mut rx = self.pushes.subscribe();
            Some(Subscription::new(tokio::spawn(async move {
                while let Ok(update) = rx.recv().await {
                    on_change(update);
                }
            })))
        }

        async fn persist_account(&self, _record: AccountRecord) -> Result<(), IpcError> {
            Ok(())
        }

        async fn update_account(&self, _record: AccountRecord) -> Result<(), IpcError> {
            Ok(())
        }

        async fn remove_account(&self, _address: &str) -> Result<(), IpcError> {
            Ok(())
        }

        async fn fetch_referenda(&self, _chain: &str) -> Result<Value, IpcError> {
            Ok(Value::Array(Vec::new()))
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn mount_loads_snapshot() {
        let mut snapshot = SharedState::init();
        snapshot.set(SyncId::ModeConnected, true);
        let adapter = Arc::new(FakeAdapter::new(snapshot, false));
        let ctx = WindowContext::new(WindowId::Settings, adapter, 16);

        ctx.mount().await.unwrap();
        assert!(ctx.get(SyncId::ModeConnected));
        assert!(!ctx.is_listening());
    }

    #[tokio::test]
    async fn reset_clears_locally_and_is_queued_after_relays() {
        let adapter = Arc::new(FakeAdapter::new(SharedState::init(), false));
        let ctx = WindowContext::new(WindowId::Settings, adapter.clone(), 16);

        ctx.relay(SyncId::WcConnecting, true);
        ctx.reset();
        assert!(!ctx.get(SyncId::WcConnecting));
        ctx.flush().await;

        assert_eq!(adapter.relays.lock().unwrap().len(), 1);
        assert_eq!(*adapter.resets.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn relays_leave_in_order() {
        let mut fake = FakeAdapter::new(SharedState::init(), false);
        fake.relay_delay = Duration::from_millis(2);
        let adapter = Arc::new(fake);
        let ctx = WindowContext::new(WindowId::Import, adapter.clone(), 16);

        ctx.relay(SyncId::AccountImporting, true);
        ctx.relay(SyncId::AccountImporting, false);
        ctx.relay(SyncId::BackupImporting, true);
        assert!(!ctx.get(SyncId::AccountImporting));
        ctx.flush().await;

        let relays = adapter.relays.lock().unwrap().clone();
        assert_eq!(
            relays,
            vec![
                SyncUpdate { key: SyncId::AccountImporting, value: true },
                SyncUpdate { key: SyncId::AccountImporting, value: false },
                SyncUpdate { key: SyncId::BackupImporting, value: true },
            ]
        );
    }

    #[tokio::test]
    async fn pushes_apply_without_rebroadcast() {
        let adapter = Arc::new(FakeAdapter::new(SharedState::init(), true));
        let ctx = WindowContext::new(WindowId::Action, adapter.clone(), 16);
        ctx.mount().await.unwrap();
        assert!(ctx.is_listening());

        adapter
            .pushes
            .send(SyncUpdate { key: SyncId::ExtrinsicBuilding, value: true })
            .unwrap();
        settle().await;
        ctx.flush().await;

        assert!(ctx.get(SyncId::ExtrinsicBuilding));
        assert!(adapter.relays.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn push_during_mount_is_applied_after_snapshot() {
        let adapter = Arc::new(FakeAdapter::new(SharedState::init(), true));
        let (release, gate) = oneshot::channel();
        *adapter.gate.lock().unwrap() = Some(gate);
        let ctx = Arc::new(WindowContext::new(WindowId::Tabs, adapter.clone(), 16));

        let mounting = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.mount().await })
        };
        settle().await;

        // Snapshot (all false) is still in flight when this push lands.
        adapter
            .pushes
            .send(SyncUpdate { key: SyncId::WcConnecting, value: true })
            .unwrap();
        settle().await;
        release.send(()).unwrap();
        mounting.await.unwrap().unwrap();
        settle().await;

        assert!(ctx.get(SyncId::WcConnecting));
    }
}
