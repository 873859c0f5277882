//! Channels between the main window and secondary windows.
//!
//! Provides:
//! - Envelopes for both transports (`RuntimeMessage`, `ChannelPost`, `Frame`)
//! - Ordered bidirectional endpoints created in pairs
//! - A registry holding one bound endpoint per channel role
//! - A window-side bridge with fire-and-forget posts and awaited requests

pub mod bridge;
pub mod endpoint;
pub mod envelope;
pub mod registry;

pub use bridge::ChannelBridge;
pub use endpoint::ChannelEndpoint;
pub use envelope::{decode, encode, tasks, ChannelPost, Frame, RuntimeMessage, Subsystem};
pub use registry::ChannelRegistry;
