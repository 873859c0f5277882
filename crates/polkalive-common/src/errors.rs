use std::path::PathBuf;

use crate::types::ChannelRole;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("clipboard error: {0}")]
    ClipboardError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Failures of the inter-window transports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpcError {
    /// A channel was read before bootstrap bound it. Never retried.
    #[error("channel {0} accessed before it was bound")]
    UnboundChannel(ChannelRole),

    #[error("channel closed: {0}")]
    ChannelClosed(String),

    #[error("failed to encode payload: {0}")]
    Encode(String),

    #[error("failed to decode payload: {0}")]
    Decode(String),

    /// The receiving process handled the request and reported an error.
    #[error("remote error: {0}")]
    Remote(String),

    #[error("unknown task: {0}")]
    UnknownTask(String),

    #[error("extension runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

impl IpcError {
    /// Text sent back across a process boundary. A `Remote` error keeps its
    /// message as is, so it is not prefixed twice on the other side.
    pub fn remote_message(self) -> String {
        match self {
            IpcError::Remote(message) => message,
            other => other.to_string(),
        }
    }

    /// The error a caller sees after it crossed a process boundary.
    pub fn into_remote(self) -> Self {
        IpcError::Remote(self.remote_message())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Ipc(#[from] IpcError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
