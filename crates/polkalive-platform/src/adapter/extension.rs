use std::sync::Arc;

use async_trait::async_trait;
use polkalive_common::{IpcError, PlatformVariant, SyncId, TabId};
use polkalive_state::{SharedState, SyncUpdate};
use serde_json::Value;
use tracing::debug;

use super::call::{reply_bool, reply_snapshot, Call};
use super::types::{AccountRecord, ActionMeta, AnalyticsEvent, StateCallback, Subscription};
use super::PlatformAdapter;
use crate::runtime::RuntimeTransport;

/// Adapter for the extension host: every operation is one awaited runtime
/// message `{ type, task, payload }`.
#[derive(Clone)]
pub struct ExtensionAdapter {
    runtime: Arc<dyn RuntimeTransport>,
}

impl ExtensionAdapter {
    pub fn new(runtime: Arc<dyn RuntimeTransport>) -> Self {
        Self { runtime }
    }

    async fn send(&self, call: Call<'_>) -> Result<Value, IpcError> {
        let message = call.to_message()?;
        debug!(subsystem = %message.subsystem, task = %message.task, "runtime message");
        self.runtime.send_message(message).await
    }
}

#[async_trait]
impl PlatformAdapter for ExtensionAdapter {
    fn variant(&self) -> PlatformVariant {
        PlatformVariant::Extension
    }

    async fn relay_state(&self, key: SyncId, value: bool) -> Result<(), IpcError> {
        self.send(Call::Relay(SyncUpdate { key, value })).await.map(drop)
    }

    async fn reset_shared_state(&self) -> Result<(), IpcError> {
        self.send(Call::Reset).await.map(drop)
    }

    async fn open_tab(
        &self,
        id: &TabId,
        data: Option<Value>,
        analytics: Option<AnalyticsEvent>,
    ) -> Result<(), IpcError> {
        self.send(Call::OpenTab {
            id,
            data,
            analytics,
        })
        .await
        .map(drop)
    }

    async fn is_tab_open(&self, id: &TabId) -> Result<bool, IpcError> {
        reply_bool(self.send(Call::IsTabOpen(id)).await?)
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), IpcError> {
        self.send(Call::Copy(text)).await.map(drop)
    }

    async fn init_action(&self, meta: ActionMeta) -> Result<(), IpcError> {
        self.send(Call::InitAction(&meta)).await.map(drop)
    }

    async fn get_shared_state_on_mount(&self) -> Result<SharedState, IpcError> {
        reply_snapshot(self.send(Call::GetAll).await?)
    }

    /// The runtime cannot push; windows rely on the snapshot fetched on mount.
    fn listen_shared_state_on_mount(&self, _on_change: StateCallback) -> Option<Subscription> {
        None
    }

    async fn persist_account(&self, record: AccountRecord) -> Result<(), IpcError> {
        self.send(Call::PersistAccount(&record)).await.map(drop)
    }

    async fn update_account(&self, record: AccountRecord) -> Result<(), IpcError> {
        self.send(Call::UpdateAccount(&record)).await.map(drop)
    }

    async fn remove_account(&self, address: &str) -> Result<(), IpcError> {
        self.send(Call::RemoveAccount(address)).await.map(drop)
    }

    async fn fetch_referenda(&self, chain: &str) -> Result<Value, IpcError> {
        self.send(Call::FetchReferenda(chain)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polkalive_ipc::{RuntimeMessage, Subsystem};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every message and answers from a fixed table.
    #[derive(Default)]
    struct ScriptedRuntime {
        sent: Mutex<Vec<RuntimeMessage>>,
    }

    #[async_trait]
    impl RuntimeTransport for ScriptedRuntime {
        async fn send_message(&self, message: RuntimeMessage) -> Result<Value, IpcError> {
            let reply = match (message.subsystem, message.task.as_str()) {
                (Subsystem::Tabs, "isOpen") => json!(message.payload["id"] == "settings"),
                (Subsystem::SharedState, "getAll") => json!({"wc:initialized": true}),
                (Subsystem::OpenGov, _) => {
                    return Err(IpcError::RuntimeUnavailable("background asleep".into()))
                }
                _ => Value::Null,
            };
            self.sent.lock().unwrap().push(message);
            Ok(reply)
        }
    }

    fn adapter() -> (Arc<ScriptedRuntime>, ExtensionAdapter) {
        let runtime = Arc::new(ScriptedRuntime::default());
        (runtime.clone(), ExtensionAdapter::new(runtime))
    }

    #[tokio::test]
    async fn each_call_is_one_runtime_message() {
        let (runtime, adapter) = adapter();
        adapter.relay_state(SyncId::ModeOnline, true).await.unwrap();
        adapter.copy_to_clipboard("1abc").await.unwrap();
        adapter.remove_account("1abc").await.unwrap();
        adapter.reset_shared_state().await.unwrap();

        let sent = runtime.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].subsystem, Subsystem::SharedState);
        assert_eq!(sent[0].task, "relay");
        assert_eq!(sent[0].payload, json!({"key": "mode:online", "value": true}));
        assert_eq!(sent[1].payload, json!({"text": "1abc"}));
        assert_eq!(sent[2].subsystem, Subsystem::RawAccount);
        assert_eq!(sent[2].payload, json!({"address": "1abc"}));
        assert_eq!(sent[3].task, "reset");
        assert_eq!(sent[3].payload, Value::Null);
    }

    #[tokio::test]
    async fn replies_are_decoded() {
        let (_, adapter) = adapter();
        assert!(adapter.is_tab_open(&TabId::new("settings")).await.unwrap());
        assert!(!adapter.is_tab_open(&TabId::new("import")).await.unwrap());

        let state = adapter.get_shared_state_on_mount().await.unwrap();
        assert!(state.get(SyncId::WcInitialized));
        assert!(!state.get(SyncId::WcConnecting));
    }

    #[tokio::test]
    async fn runtime_errors_propagate() {
        let (_, adapter) = adapter();
        let err = adapter.fetch_referenda("Polkadot").await.unwrap_err();
        assert!(matches!(err, IpcError::RuntimeUnavailable(_)));
    }

    #[test]
    fn listen_has_no_subscription() {
        let (_, adapter) = adapter();
        assert!(adapter
            .listen_shared_state_on_mount(Arc::new(|_: SyncUpdate| {}))
            .is_none());
    }
}
