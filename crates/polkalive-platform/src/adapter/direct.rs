use std::sync::Arc;

use async_trait::async_trait;
use polkalive_common::{IpcError, PlatformVariant, SyncId, TabId};
use polkalive_ipc::{tasks, ChannelBridge, ChannelPost, Subsystem};
use polkalive_state::{SharedState, SyncUpdate};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::call::{reply_bool, reply_snapshot, Call};
use super::types::{AccountRecord, ActionMeta, AnalyticsEvent, StateCallback, Subscription};
use super::PlatformAdapter;

/// Adapter over the window's bound channel to main.
///
/// Effects that need no answer (relay, open tab, copy, init action) are
/// posted fire-and-forget; everything else is a request awaited on the same
/// ordered channel, so a request observes every post sent before it.
#[derive(Clone)]
pub struct DirectAdapter {
    bridge: Arc<ChannelBridge>,
}

impl DirectAdapter {
    pub fn new(bridge: Arc<ChannelBridge>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<ChannelBridge> {
        &self.bridge
    }

    fn post(&self, call: Call<'_>) -> Result<(), IpcError> {
        self.bridge.send(&call.to_post()?)
    }

    async fn request(&self, call: Call<'_>) -> Result<Value, IpcError> {
        let post = call.to_post()?;
        self.bridge.invoke(&post).await
    }
}

#[async_trait]
impl PlatformAdapter for DirectAdapter {
    fn variant(&self) -> PlatformVariant {
        PlatformVariant::Direct
    }

    async fn relay_state(&self, key: SyncId, value: bool) -> Result<(), IpcError> {
        self.post(Call::Relay(SyncUpdate { key, value }))
    }

    async fn reset_shared_state(&self) -> Result<(), IpcError> {
        self.post(Call::Reset)
    }

    async fn open_tab(
        &self,
        id: &TabId,
        data: Option<Value>,
        analytics: Option<AnalyticsEvent>,
    ) -> Result<(), IpcError> {
        self.post(Call::OpenTab {
            id,
            data,
            analytics,
        })
    }

    async fn is_tab_open(&self, id: &TabId) -> Result<bool, IpcError> {
        reply_bool(self.request(Call::IsTabOpen(id)).await?)
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), IpcError> {
        self.post(Call::Copy(text))
    }

    async fn init_action(&self, meta: ActionMeta) -> Result<(), IpcError> {
        self.post(Call::InitAction(&meta))
    }

    async fn get_shared_state_on_mount(&self) -> Result<SharedState, IpcError> {
        reply_snapshot(self.request(Call::GetAll).await?)
    }

    fn listen_shared_state_on_mount(&self, on_change: StateCallback) -> Option<Subscription> {
        let mut pushes = self.bridge.subscribe();
        let window = self.bridge.window();

        let task = tokio::spawn(async move {
            loop {
                let post = match pushes.recv().await {
                    Ok(post) => post,
                    Err(RecvError::Lagged(n)) => {
                        warn!(%window, skipped = n, "shared-state listener lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                deliver(&post, &on_change);
            }
            debug!(%window, "shared-state listener stopped");
        });
        Some(Subscription::new(task))
    }

    async fn persist_account(&self, record: AccountRecord) -> Result<(), IpcError> {
        self.request(Call::PersistAccount(&record)).await.map(drop)
    }

    async fn update_account(&self, record: AccountRecord) -> Result<(), IpcError> {
        self.request(Call::UpdateAccount(&record)).await.map(drop)
    }

    async fn remove_account(&self, address: &str) -> Result<(), IpcError> {
        self.request(Call::RemoveAccount(address)).await.map(drop)
    }

    async fn fetch_referenda(&self, chain: &str) -> Result<Value, IpcError> {
        self.request(Call::FetchReferenda(chain)).await
    }
}

/// Route one pushed post to the shared-state callback. Other pushes are
/// left for their own subscribers.
fn deliver(post: &ChannelPost, on_change: &StateCallback) {
    match post.route() {
        Ok((Subsystem::SharedState, tasks::SYNC)) => {
            match serde_json::from_value::<SyncUpdate>(post.data.clone()) {
                Ok(update) => on_change(update),
                Err(e) => warn!(task = %post.task, error = %e, "bad sync payload"),
            }
        }
        Ok((Subsystem::SharedState, tasks::RESET)) => {
            for key in SyncId::ALL {
                on_change(SyncUpdate { key, value: false });
            }
        }
        Ok(_) => {}
        Err(e) => debug!(task = %post.task, error = %e, "ignoring push"),
    }
}
