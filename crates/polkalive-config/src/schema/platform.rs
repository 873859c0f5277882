//! Platform selection: which adapter variant this process runs.

use polkalive_common::PlatformVariant;
use serde::{Deserialize, Serialize};

/// Platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Adapter variant, chosen once per process.
    pub variant: PlatformVariant,
    /// Copy through the OS clipboard. When off, copies are kept in memory
    /// (headless runs and tests).
    pub system_clipboard: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            variant: PlatformVariant::Direct,
            system_clipboard: true,
        }
    }
}
