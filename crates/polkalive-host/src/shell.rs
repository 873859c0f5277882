//! Application bootstrap: wires every window to the host over the transport
//! the configuration selects.
//!
//! Direct variant: one endpoint pair per channel role. The main end is bound
//! in main's registry and served by [`MainProcess`]; the window end is bound
//! in that window's own registry and read by its bridge.
//!
//! Extension variant: every window talks to one in-process
//! [`BackgroundWorker`].

use std::collections::BTreeMap;
use std::sync::Arc;

use polkalive_common::{ChannelRole, IpcError, LiveError, PlatformVariant, SyncId, WindowId};
use polkalive_config::LiveConfig;
use polkalive_ipc::{ChannelBridge, ChannelEndpoint, ChannelRegistry};
use polkalive_platform::{Adapter, ClipboardSink, MemoryClipboard, SystemClipboard, WindowContext};
use tracing::info;

use crate::background::BackgroundWorker;
use crate::main_process::MainProcess;
use crate::push::Push;
use crate::state::HostState;

enum Transport {
    Direct(MainProcess),
    Extension(Arc<BackgroundWorker>),
}

pub struct Shell {
    host: Arc<HostState>,
    transport: Transport,
    windows: BTreeMap<WindowId, Arc<WindowContext>>,
    push_capacity: usize,
    event_capacity: usize,
}

impl Shell {
    /// Build the host and mount every secondary window.
    pub async fn bootstrap(config: &LiveConfig) -> Result<Self, LiveError> {
        let clipboard: Arc<dyn ClipboardSink> = if config.platform.system_clipboard {
            Arc::new(SystemClipboard::new())
        } else {
            Arc::new(MemoryClipboard::new())
        };
        Self::bootstrap_with(config, clipboard).await
    }

    pub async fn bootstrap_with(
        config: &LiveConfig,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Result<Self, LiveError> {
        let event_capacity = config.ipc.event_bus_capacity as usize;
        let push_capacity = config.ipc.push_capacity as usize;
        let variant = config.platform.variant;
        let host = Arc::new(HostState::new(clipboard, event_capacity));

        let transport = match variant {
            PlatformVariant::Direct => {
                let registry = Arc::new(ChannelRegistry::new(WindowId::Main));
                Transport::Direct(MainProcess::start(registry, Arc::clone(&host)))
            }
            PlatformVariant::Extension => {
                Transport::Extension(Arc::new(BackgroundWorker::new(Arc::clone(&host))))
            }
        };

        let mut shell = Self {
            host,
            transport,
            windows: BTreeMap::new(),
            push_capacity,
            event_capacity,
        };
        for role in ChannelRole::ALL {
            shell.open_window(role.window()).await?;
        }
        info!(?variant, windows = shell.windows.len(), "shell ready");
        Ok(shell)
    }

    /// (Re)create `window`'s context and mount it. On the direct variant a
    /// fresh channel pair replaces the previous binding.
    pub async fn open_window(&mut self, window: WindowId) -> Result<Arc<WindowContext>, LiveError> {
        let role = window
            .channel_role()
            .ok_or_else(|| LiveError::Other(format!("{window} has no channel to main")))?;

        let adapter = match &self.transport {
            Transport::Direct(main) => {
                let (main_end, window_end) = ChannelEndpoint::pair(WindowId::Main, window);
                main.registry().bind(role, main_end);

                let window_registry = ChannelRegistry::new(window);
                window_registry.bind(role, window_end);
                let bridge = ChannelBridge::from_registry(&window_registry, role, self.push_capacity)?;
                Adapter::direct(Arc::new(bridge))
            }
            Transport::Extension(worker) => Adapter::extension(worker.clone()),
        };

        let ctx = Arc::new(WindowContext::new(window, Arc::new(adapter), self.event_capacity));
        ctx.mount().await?;
        self.windows.insert(window, Arc::clone(&ctx));
        Ok(ctx)
    }

    pub fn variant(&self) -> PlatformVariant {
        match self.transport {
            Transport::Direct(_) => PlatformVariant::Direct,
            Transport::Extension(_) => PlatformVariant::Extension,
        }
    }

    pub fn host(&self) -> &Arc<HostState> {
        &self.host
    }

    pub fn window(&self, id: WindowId) -> Result<&Arc<WindowContext>, IpcError> {
        self.windows
            .get(&id)
            .ok_or_else(|| IpcError::ChannelClosed(format!("{id} is not open")))
    }

    pub fn windows(&self) -> impl Iterator<Item = (&WindowId, &Arc<WindowContext>)> {
        self.windows.iter()
    }

    /// Set a flag from main. On the direct variant every window hears it; on
    /// the extension variant it stays in the background until windows remount.
    pub fn relay_state(&self, key: SyncId, value: bool) {
        self.host.replica().set(key, value);
    }

    /// Reset the host replica and tell every window that can hear it.
    pub fn reset_state(&self) {
        self.host.replica().reset();
        match &self.transport {
            Transport::Direct(main) => main.deliver(&Push::Reset),
            Transport::Extension(_) => info!("reset stays in the background until windows remount"),
        }
    }

    pub fn shutdown(self) {
        if let Transport::Direct(main) = &self.transport {
            main.shutdown();
        }
        info!("shell stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(variant: PlatformVariant) -> LiveConfig {
        let mut config = LiveConfig::default();
        config.platform.variant = variant;
        config.platform.system_clipboard = false;
        config
    }

    #[tokio::test]
    async fn bootstrap_mounts_every_secondary_window() {
        for variant in [PlatformVariant::Direct, PlatformVariant::Extension] {
            let shell = Shell::bootstrap(&config(variant)).await.unwrap();
            assert_eq!(shell.variant(), variant);
            for role in ChannelRole::ALL {
                let ctx = shell.window(role.window()).unwrap();
                assert_eq!(ctx.adapter().variant(), variant);
            }
            assert!(shell.window(WindowId::Main).is_err());
        }
    }

    #[tokio::test]
    async fn reset_reaches_direct_windows() {
        let shell = Shell::bootstrap(&config(PlatformVariant::Direct)).await.unwrap();
        let import = shell.window(WindowId::Import).unwrap().clone();
        let settings = shell.window(WindowId::Settings).unwrap().clone();

        import.relay(SyncId::BackupImporting, true);
        import.flush().await;
        wait_for(|| settings.get(SyncId::BackupImporting)).await;

        shell.reset_state();
        wait_for(|| !settings.get(SyncId::BackupImporting) && !import.get(SyncId::BackupImporting))
            .await;
    }

    #[tokio::test]
    async fn reopened_window_gets_current_snapshot() {
        let mut shell = Shell::bootstrap(&config(PlatformVariant::Direct)).await.unwrap();
        let action = shell.window(WindowId::Action).unwrap().clone();
        action.relay(SyncId::ExtrinsicBuilding, true);
        action.flush().await;
        wait_for(|| shell.host().snapshot().get(SyncId::ExtrinsicBuilding)).await;

        let reopened = shell.open_window(WindowId::OpenGov).await.unwrap();
        assert!(reopened.get(SyncId::ExtrinsicBuilding));
    }

    #[tokio::test]
    async fn main_relay_stays_in_background_on_extension() {
        let mut shell = Shell::bootstrap(&config(PlatformVariant::Extension)).await.unwrap();
        shell.relay_state(SyncId::ModeOnline, true);

        assert!(shell.host().snapshot().get(SyncId::ModeOnline));
        assert!(!shell.window(WindowId::Import).unwrap().get(SyncId::ModeOnline));
        let import = shell.open_window(WindowId::Import).await.unwrap();
        assert!(import.get(SyncId::ModeOnline));
    }

    async fn wait_for(cond: impl Fn() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not met within 1s");
    }
}
