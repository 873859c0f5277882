//! Types shared by every polkalive crate: window and channel identifiers,
//! the shared-state key vocabulary, the error taxonomy, and the event bus.

pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, IpcError, LiveError, PlatformError};
pub use events::{Event, EventBus};
pub use id::{new_correlation_id, new_id, RequestId};
pub use types::{ChannelRole, PlatformVariant, SyncId, TabId, WindowId};

pub type Result<T> = std::result::Result<T, LiveError>;
