//! Extension background worker: answers runtime messages in-process.

use std::sync::Arc;

use async_trait::async_trait;
use polkalive_common::IpcError;
use polkalive_ipc::RuntimeMessage;
use polkalive_platform::RuntimeTransport;
use serde_json::Value;
use tracing::debug;

use crate::state::HostState;

/// The extension runtime has no push path, so the pushes a task produces
/// are dropped here; windows catch up through the snapshot on mount.
pub struct BackgroundWorker {
    host: Arc<HostState>,
}

impl BackgroundWorker {
    pub fn new(host: Arc<HostState>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<HostState> {
        &self.host
    }
}

#[async_trait]
impl RuntimeTransport for BackgroundWorker {
    async fn send_message(&self, message: RuntimeMessage) -> Result<Value, IpcError> {
        let outcome = self
            .host
            .dispatch(message.subsystem, &message.task, message.payload)
            // Same shape a failed reply frame has on the direct channel.
            .map_err(IpcError::into_remote)?;
        if !outcome.pushes.is_empty() {
            debug!(
                subsystem = %message.subsystem,
                task = %message.task,
                pushes = outcome.pushes.len(),
                "no push path, dropping pushes"
            );
        }
        Ok(outcome.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polkalive_common::{SyncId, TabId};
    use polkalive_ipc::{tasks, Subsystem};
    use polkalive_platform::{ExtensionAdapter, MemoryClipboard, PlatformAdapter};
    use serde_json::json;

    fn worker() -> Arc<BackgroundWorker> {
        let host = Arc::new(HostState::new(Arc::new(MemoryClipboard::new()), 16));
        Arc::new(BackgroundWorker::new(host))
    }

    #[tokio::test]
    async fn message_is_dispatched() {
        let worker = worker();
        let msg = RuntimeMessage::new(
            Subsystem::SharedState,
            tasks::RELAY,
            json!({"key": "wc:initialized", "value": true}),
        );
        assert_eq!(worker.send_message(msg).await.unwrap(), Value::Null);
        assert!(worker.host().snapshot().get(SyncId::WcInitialized));
    }

    #[tokio::test]
    async fn errors_surface_as_remote() {
        let worker = worker();
        let msg = RuntimeMessage::new(Subsystem::OpenGov, "vote", Value::Null);
        let err = worker.send_message(msg).await.unwrap_err();
        assert_eq!(err, IpcError::Remote("unknown task: openGov:vote".into()));
    }

    #[tokio::test]
    async fn extension_adapter_round_trip() {
        let worker = worker();
        let adapter = ExtensionAdapter::new(worker.clone());
        adapter
            .open_tab(&TabId::new("settings"), None, None)
            .await
            .unwrap();
        assert!(adapter.is_tab_open(&TabId::new("settings")).await.unwrap());
        assert_eq!(worker.host().open_tabs(), vec![TabId::new("settings")]);
    }
}
