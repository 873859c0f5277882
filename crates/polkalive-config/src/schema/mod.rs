//! Configuration schema types for polkalive.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod ipc;
mod platform;
mod system;

pub use ipc::*;
pub use platform::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Every option has a default; only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LiveConfig {
    pub platform: PlatformConfig,
    pub ipc: IpcConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
