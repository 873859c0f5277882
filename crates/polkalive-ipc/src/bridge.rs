//! Window-side bridge over a bound channel.
//!
//! Gives a secondary window the two operations a preload bridge exposes:
//! - `send`: fire-and-forget post to main.
//! - `invoke`: post a request and await main's reply.
//!
//! Posts pushed by main (state syncs, tab additions) fan out to every
//! [`ChannelBridge::subscribe`] receiver. Invocations have no timeout: if main
//! never answers, the caller waits forever.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use polkalive_common::{ChannelRole, IpcError, RequestId, WindowId};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::endpoint::ChannelEndpoint;
use crate::envelope::{decode, ChannelPost, Frame};
use crate::registry::ChannelRegistry;

type Pending = Arc<Mutex<HashMap<RequestId, oneshot::Sender<Result<Value, IpcError>>>>>;

pub struct ChannelBridge {
    endpoint: ChannelEndpoint,
    pending: Pending,
    pushes: broadcast::Sender<ChannelPost>,
    reader: JoinHandle<()>,
}

impl ChannelBridge {
    /// Start reading `endpoint`. Must be called inside a Tokio runtime.
    pub fn connect(endpoint: ChannelEndpoint, push_capacity: usize) -> Result<Self, IpcError> {
        let rx = endpoint.take_receiver().ok_or_else(|| {
            IpcError::ChannelClosed(format!("{} receiver already taken", endpoint.owner()))
        })?;
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let (pushes, _) = broadcast::channel(push_capacity.max(1));

        let reader = tokio::spawn(read_loop(
            endpoint.clone(),
            rx,
            Arc::clone(&pending),
            pushes.clone(),
        ));

        Ok(Self {
            endpoint,
            pending,
            pushes,
            reader,
        })
    }

    /// Connect to the endpoint bootstrap bound under `role`.
    pub fn from_registry(
        registry: &ChannelRegistry,
        role: ChannelRole,
        push_capacity: usize,
    ) -> Result<Self, IpcError> {
        Self::connect(registry.get(role)?, push_capacity)
    }

    /// The window this bridge runs in.
    pub fn window(&self) -> WindowId {
        self.endpoint.owner()
    }

    pub fn send(&self, post: &ChannelPost) -> Result<(), IpcError> {
        debug!(window = %self.window(), task = %post.task, "post");
        self.endpoint.post(Frame::post(post)?)
    }

    pub async fn invoke(&self, post: &ChannelPost) -> Result<Value, IpcError> {
        let id = RequestId::new();
        let frame = Frame::request(id.clone(), post)?;
        let (tx, rx) = oneshot::channel();

        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id.clone(), tx);
        }

        debug!(window = %self.window(), task = %post.task, request = %id, "invoke");
        if let Err(e) = self.endpoint.post(frame) {
            if let Ok(mut pending) = self.pending.lock() {
                pending.remove(&id);
            }
            return Err(e);
        }

        rx.await
            .map_err(|_| IpcError::ChannelClosed(format!("{} bridge dropped", self.window())))?
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelPost> {
        self.pushes.subscribe()
    }

    /// Requests still waiting for a reply.
    pub fn pending_requests(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Drop for ChannelBridge {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(
    endpoint: ChannelEndpoint,
    mut rx: mpsc::UnboundedReceiver<Frame>,
    pending: Pending,
    pushes: broadcast::Sender<ChannelPost>,
) {
    let window = endpoint.owner();
    while let Some(frame) = rx.recv().await {
        match frame {
            Frame::Reply { id, ok, data } => {
                let waiter = pending.lock().ok().and_then(|mut p| p.remove(&id));
                let Some(waiter) = waiter else {
                    warn!(%window, request = %id, "reply for unknown request");
                    continue;
                };
                let result = if ok {
                    decode(&data)
                } else {
                    Err(IpcError::Remote(data))
                };
                let _ = waiter.send(result);
            }
            Frame::Post { task, data } => match decode(&data) {
                Ok(data) => {
                    debug!(%window, %task, "push");
                    let _ = pushes.send(ChannelPost { task, data });
                }
                Err(e) => warn!(%window, %task, error = %e, "dropping undecodable push"),
            },
            Frame::Request { id, task, .. } => {
                warn!(%window, %task, "windows do not serve requests");
                let _ = endpoint.post(Frame::reply(id, Err(IpcError::UnknownTask(task))));
            }
        }
    }
    debug!(%window, "channel closed, bridge reader exiting");
}
