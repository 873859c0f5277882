//! Channel and observer sizing.

use serde::{Deserialize, Serialize};

/// IPC configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Buffered shared-state notifications per observer (valid range: 16-4096).
    pub event_bus_capacity: u32,
    /// Buffered main-to-window pushes per subscriber (valid range: 16-4096).
    pub push_capacity: u32,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: 64,
            push_capacity: 64,
        }
    }
}
