//! Process-local state primitives shared by windows and hosts.
//!
//! - [`SerialTaskQueue`]: FIFO executor with at most one task in flight
//! - [`SharedStateStore`]: replicated `SyncId -> bool` flags with broadcast

pub mod shared_state;
pub mod task_queue;

pub use shared_state::{SharedState, SharedStateStore, StateBroadcaster, SyncUpdate};
pub use task_queue::SerialTaskQueue;
