use std::sync::Arc;

use async_trait::async_trait;
use polkalive_common::{IpcError, PlatformVariant, SyncId, TabId};
use polkalive_ipc::ChannelBridge;
use polkalive_state::SharedState;
use serde_json::Value;
use tracing::info;

use super::direct::DirectAdapter;
use super::extension::ExtensionAdapter;
use super::types::{AccountRecord, ActionMeta, AnalyticsEvent, StateCallback, Subscription};
use super::PlatformAdapter;
use crate::runtime::RuntimeTransport;

/// The adapter a process runs with, chosen once at startup.
#[derive(Clone)]
pub enum Adapter {
    Direct(DirectAdapter),
    Extension(ExtensionAdapter),
}

impl Adapter {
    pub fn direct(bridge: Arc<ChannelBridge>) -> Self {
        info!(window = %bridge.window(), "using direct-channel adapter");
        Adapter::Direct(DirectAdapter::new(bridge))
    }

    pub fn extension(runtime: Arc<dyn RuntimeTransport>) -> Self {
        info!("using extension-runtime adapter");
        Adapter::Extension(ExtensionAdapter::new(runtime))
    }

    fn inner(&self) -> &dyn PlatformAdapter {
        match self {
            Adapter::Direct(a) => a,
            Adapter::Extension(a) => a,
        }
    }
}

#[async_trait]
impl PlatformAdapter for Adapter {
    fn variant(&self) -> PlatformVariant {
        self.inner().variant()
    }

    async fn relay_state(&self, key: SyncId, value: bool) -> Result<(), IpcError> {
        self.inner().relay_state(key, value).await
    }

    async fn reset_shared_state(&self) -> Result<(), IpcError> {
        self.inner().reset_shared_state().await
    }

    async fn open_tab(
        &self,
        id: &TabId,
        data: Option<Value>,
        analytics: Option<AnalyticsEvent>,
    ) -> Result<(), IpcError> {
        self.inner().open_tab(id, data, analytics).await
    }

    async fn is_tab_open(&self, id: &TabId) -> Result<bool, IpcError> {
        self.inner().is_tab_open(id).await
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), IpcError> {
        self.inner().copy_to_clipboard(text).await
    }

    async fn init_action(&self, meta: ActionMeta) -> Result<(), IpcError> {
        self.inner().init_action(meta).await
    }

    async fn get_shared_state_on_mount(&self) -> Result<SharedState, IpcError> {
        self.inner().get_shared_state_on_mount().await
    }

    fn listen_shared_state_on_mount(&self, on_change: StateCallback) -> Option<Subscription> {
        self.inner().listen_shared_state_on_mount(on_change)
    }

    async fn persist_account(&self, record: AccountRecord) -> Result<(), IpcError> {
        self.inner().persist_account(record).await
    }

    async fn update_account(&self, record: AccountRecord) -> Result<(), IpcError> {
        self.inner().update_account(record).await
    }

    async fn remove_account(&self, address: &str) -> Result<(), IpcError> {
        self.inner().remove_account(address).await
    }

    async fn fetch_referenda(&self, chain: &str) -> Result<Value, IpcError> {
        self.inner().fetch_referenda(chain).await
    }
}
