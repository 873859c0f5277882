//! Platform layer for polkalive windows.
//!
//! Provides:
//! - The [`PlatformAdapter`] capability contract and its two transports:
//!   [`DirectAdapter`] over a bound channel and [`ExtensionAdapter`] over a
//!   message-passing runtime, selected once per process through [`Adapter`]
//! - [`WindowContext`], the per-window composition of adapter, replica and queue
//! - Clipboard sinks

pub mod adapter;
pub mod clipboard;
pub mod runtime;
pub mod window;

pub use adapter::{
    AccountRecord, ActionMeta, Adapter, AnalyticsEvent, DirectAdapter, ExtensionAdapter,
    PlatformAdapter, StateCallback, Subscription,
};
pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use runtime::RuntimeTransport;
pub use window::WindowContext;
