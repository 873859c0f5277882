//! Main-process channel server: one reader per bound window channel.
//!
//! Each reader dispatches frames from its window into [`HostState`], answers
//! requests on the same channel, and delivers the resulting pushes to the
//! other windows. A rebind (window reload) starts a reader on the new
//! endpoint; the old reader exits when its channel closes.
//!
//! Main's own replica broadcasts through [`MainBroadcaster`], so a `set` made
//! in main reaches every bound window.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use polkalive_common::{ChannelRole, Event, IpcError};
use polkalive_ipc::{decode, ChannelEndpoint, ChannelPost, ChannelRegistry, Frame};
use polkalive_state::{StateBroadcaster, SyncUpdate};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::push::Push;
use crate::state::HostState;

/// Shared by the bind watcher and every reader.
#[derive(Clone)]
struct Server {
    registry: Arc<ChannelRegistry>,
    host: Arc<HostState>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

/// Dropping the process stops every reader and the bind watcher.
pub struct MainProcess {
    server: Server,
}

impl MainProcess {
    /// Serve every channel bound in `registry`, now and after later binds.
    /// Must be called inside a Tokio runtime.
    pub fn start(registry: Arc<ChannelRegistry>, host: Arc<HostState>) -> Self {
        host.replica().set_broadcaster(Arc::new(MainBroadcaster::new(&registry)));
        let server = Server {
            registry,
            host,
            tasks: Arc::new(Mutex::new(Vec::new())),
        };

        // Subscribe before serving existing bindings so no bind is missed.
        let mut binds = server.registry.subscribe();
        for role in server.registry.bound_roles() {
            server.serve(role);
        }

        let watcher = {
            let server = server.clone();
            tokio::spawn(async move {
                loop {
                    match binds.recv().await {
                        Ok(Event::ChannelBound(role)) => server.serve(role),
                        Ok(_) => {}
                        Err(RecvError::Lagged(n)) => {
                            warn!(skipped = n, "bind watcher lagged, rescanning");
                            for role in server.registry.bound_roles() {
                                server.serve(role);
                            }
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        };
        server.track(watcher);
        Self { server }
    }

    pub fn host(&self) -> &Arc<HostState> {
        &self.server.host
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.server.registry
    }

    /// Send `push` to every bound window in its audience, e.g. a reset
    /// issued by main itself.
    pub fn deliver(&self, push: &Push) {
        self.server.deliver(push, None);
    }

    /// Stop every reader and the bind watcher.
    pub fn shutdown(&self) {
        let tasks = std::mem::take(
            &mut *self
                .server
                .tasks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        info!(tasks = tasks.len(), "main process shutting down");
        for task in tasks {
            task.abort();
        }
    }
}

impl Drop for MainProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Server {
    fn track(&self, task: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    /// Start a reader on the endpoint bound under `role`, unless one is
    /// already reading it.
    fn serve(&self, role: ChannelRole) {
        let Ok(endpoint) = self.registry.get(role) else {
            return;
        };
        let Some(mut rx) = endpoint.take_receiver() else {
            debug!(%role, "endpoint already served");
            return;
        };
        info!(%role, channel = %endpoint.id(), "serving window channel");

        let server = self.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                server.handle_frame(role, &endpoint, frame);
            }
            debug!(%role, "window channel closed");
        });
        self.track(reader);
    }

    fn handle_frame(&self, origin: ChannelRole, endpoint: &ChannelEndpoint, frame: Frame) {
        match frame {
            Frame::Post { task, data } => {
                if let Err(e) = self.run(origin, task.clone(), &data) {
                    warn!(%origin, %task, error = %e, "post failed");
                }
            }
            Frame::Request { id, task, data } => {
                let result = self.run(origin, task, &data);
                if let Err(e) = endpoint.post(Frame::reply(id, result)) {
                    warn!(%origin, error = %e, "could not deliver reply");
                }
            }
            Frame::Reply { id, .. } => {
                warn!(%origin, request = %id, "main does not send requests, dropping reply");
            }
        }
    }

    fn run(
        &self,
        origin: ChannelRole,
        task: String,
        data: &str,
    ) -> Result<serde_json::Value, IpcError> {
        let post = ChannelPost {
            task,
            data: decode(data)?,
        };
        let (subsystem, task) = post.route()?;
        let outcome = self.host.dispatch(subsystem, task, post.data.clone())?;
        for push in &outcome.pushes {
            self.deliver(push, Some(origin));
        }
        Ok(outcome.reply)
    }

    fn deliver(&self, push: &Push, origin: Option<ChannelRole>) {
        deliver_to(&self.registry, push, origin);
    }
}

/// Broadcasts changes made in main's replica to every bound window.
///
/// Holds the registry weakly: the host owns the replica, and the replica owns
/// this broadcaster.
pub struct MainBroadcaster {
    registry: Weak<ChannelRegistry>,
}

impl MainBroadcaster {
    pub fn new(registry: &Arc<ChannelRegistry>) -> Self {
        Self {
            registry: Arc::downgrade(registry),
        }
    }
}

impl StateBroadcaster for MainBroadcaster {
    fn broadcast(&self, update: SyncUpdate) {
        match self.registry.upgrade() {
            Some(registry) => deliver_to(&registry, &Push::Sync(update), None),
            None => debug!(key = %update.key, "main registry gone, change stays local"),
        }
    }
}

/// Post `push` to every bound window in its audience. Failures are logged,
/// never returned.
fn deliver_to(registry: &ChannelRegistry, push: &Push, origin: Option<ChannelRole>) {
    let frame = match push.to_post().and_then(|post| Frame::post(&post)) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "could not encode push");
            return;
        }
    };
    let audience = push.audience(origin);
    for role in registry.bound_roles() {
        if !audience.includes(role) {
            continue;
        }
        let Ok(endpoint) = registry.get(role) else {
            continue;
        };
        match endpoint.post(frame.clone()) {
            Ok(()) => debug!(%role, task = ?frame.task(), "push delivered"),
            Err(e) => warn!(%role, error = %e, "push not delivered"),
        }
    }
}
