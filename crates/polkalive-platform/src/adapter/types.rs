use std::sync::Arc;

use polkalive_state::SyncUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

/// Analytics event attached to an `open_tab` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Describes a task the action window should start (e.g. an extrinsic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    /// Feature that requested the action.
    pub source: String,
    pub action: String,
    pub chain_id: String,
    /// Address the action acts for.
    pub address: String,
    #[serde(default)]
    pub data: Value,
}

/// An imported account as the core passes it around. Storage is external.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub address: String,
    pub chain_id: String,
    pub name: String,
    /// Where the account came from, e.g. `"vault"`, `"ledger"`, `"wallet-connect"`.
    pub source: String,
}

/// Callback invoked for every shared-state change pushed to this window.
pub type StateCallback = Arc<dyn Fn(SyncUpdate) + Send + Sync>;

/// Live push subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_meta_uses_camel_case() {
        let meta = ActionMeta {
            source: "openGov".into(),
            action: "vote".into(),
            chain_id: "Polkadot".into(),
            address: "1abc".into(),
            data: json!({"referendum": 42}),
        };
        let v = serde_json::to_value(&meta).unwrap();
        assert_eq!(v["chainId"], "Polkadot");
        assert_eq!(v["data"]["referendum"], 42);
    }

    #[test]
    fn analytics_without_data_omits_field() {
        let ev = AnalyticsEvent {
            event: "window-open-settings".into(),
            data: None,
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v, json!({"event": "window-open-settings"}));
    }

    #[tokio::test]
    async fn dropping_subscription_aborts_task() {
        let task = tokio::spawn(std::future::pending::<()>());
        let sub = Subscription::new(task);
        assert!(sub.is_active());
        sub.unsubscribe();
    }
}
