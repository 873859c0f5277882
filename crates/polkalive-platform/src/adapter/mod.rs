//! The capability contract every window uses for cross-window work.
//!
//! Feature code calls a [`PlatformAdapter`] and never learns which transport
//! carries the call. Both implementations must produce the same externally
//! observable effect; the only permitted difference is that
//! [`PlatformAdapter::listen_shared_state_on_mount`] returns `None` when the
//! transport cannot push.

mod call;
mod direct;
mod extension;
mod types;
mod variant;

use async_trait::async_trait;
use polkalive_common::{IpcError, PlatformVariant, SyncId, TabId};
use polkalive_state::SharedState;
use serde_json::Value;

pub use direct::DirectAdapter;
pub use extension::ExtensionAdapter;
pub use types::{AccountRecord, ActionMeta, AnalyticsEvent, StateCallback, Subscription};
pub use variant::Adapter;

#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn variant(&self) -> PlatformVariant;

    /// Hand a local shared-state change to the other windows.
    async fn relay_state(&self, key: SyncId, value: bool) -> Result<(), IpcError>;

    /// Ask the host to put every replica back to `false`.
    async fn reset_shared_state(&self) -> Result<(), IpcError>;

    async fn open_tab(
        &self,
        id: &TabId,
        data: Option<Value>,
        analytics: Option<AnalyticsEvent>,
    ) -> Result<(), IpcError>;

    async fn is_tab_open(&self, id: &TabId) -> Result<bool, IpcError>;

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), IpcError>;

    /// Start a task in the action window.
    async fn init_action(&self, meta: ActionMeta) -> Result<(), IpcError>;

    /// Full shared-state snapshot, fetched once when a window mounts.
    async fn get_shared_state_on_mount(&self) -> Result<SharedState, IpcError>;

    /// Subscribe to shared-state changes pushed by other windows.
    ///
    /// A pushed reset reaches `on_change` as `false` for every key. Returns
    /// `None` when the transport has no push path. Must be called inside a
    /// Tokio runtime.
    fn listen_shared_state_on_mount(&self, on_change: StateCallback) -> Option<Subscription>;

    async fn persist_account(&self, record: AccountRecord) -> Result<(), IpcError>;

    async fn update_account(&self, record: AccountRecord) -> Result<(), IpcError>;

    async fn remove_account(&self, address: &str) -> Result<(), IpcError>;

    /// Referenda list for `chain`, as cached by the host.
    async fn fetch_referenda(&self, chain: &str) -> Result<Value, IpcError>;
}
