//! Bidirectional, ordered endpoint between two windows.
//!
//! Endpoints are created in pairs, like the two ports of a message channel:
//! whatever one end posts arrives at the other end in send order.

use std::fmt;
use std::sync::{Arc, Mutex};

use polkalive_common::{new_correlation_id, IpcError, WindowId};
use tokio::sync::mpsc;
use tracing::debug;

use crate::envelope::Frame;

struct Inner {
    id: String,
    owner: WindowId,
    peer: WindowId,
    tx: mpsc::UnboundedSender<Frame>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Frame>>>,
}

/// One end of a window-to-window channel. Cloning shares the same end.
#[derive(Clone)]
pub struct ChannelEndpoint {
    inner: Arc<Inner>,
}

impl ChannelEndpoint {
    /// Create a connected pair: the first end is owned by `a`, the second by `b`.
    pub fn pair(a: WindowId, b: WindowId) -> (ChannelEndpoint, ChannelEndpoint) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        let id = new_correlation_id();
        debug!(channel = %id, %a, %b, "channel pair created");

        let end = |owner, peer, tx, rx| ChannelEndpoint {
            inner: Arc::new(Inner {
                id: id.clone(),
                owner,
                peer,
                tx,
                rx: Mutex::new(Some(rx)),
            }),
        };
        (end(a, b, a_tx, a_rx), end(b, a, b_tx, b_rx))
    }

    /// Id shared by both ends of the pair.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn owner(&self) -> WindowId {
        self.inner.owner
    }

    pub fn peer(&self) -> WindowId {
        self.inner.peer
    }

    /// Post a frame to the peer end.
    pub fn post(&self, frame: Frame) -> Result<(), IpcError> {
        self.inner
            .tx
            .send(frame)
            .map_err(|_| IpcError::ChannelClosed(format!("{} -> {}", self.owner(), self.peer())))
    }

    /// Take the receiving half. Only one reader per end; later calls get `None`.
    pub fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<Frame>> {
        self.inner.rx.lock().ok().and_then(|mut rx| rx.take())
    }

    /// Whether the peer end has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.inner.tx.is_closed()
    }
}

impl PartialEq for ChannelEndpoint {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ChannelEndpoint {}

impl fmt::Debug for ChannelEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelEndpoint")
            .field("id", &self.inner.id)
            .field("owner", &self.inner.owner)
            .field("peer", &self.inner.peer)
            .finish()
    }
}
