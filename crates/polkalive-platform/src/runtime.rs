use async_trait::async_trait;
use polkalive_common::IpcError;
use polkalive_ipc::RuntimeMessage;
use serde_json::Value;

/// Message-passing runtime of an extension host.
///
/// Every call is one awaited round trip to the background context. There is
/// no persistent channel and no way for the background to push.
#[async_trait]
pub trait RuntimeTransport: Send + Sync {
    async fn send_message(&self, message: RuntimeMessage) -> Result<Value, IpcError>;
}
