mod sync_id;
mod window;

pub use sync_id::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Which transport the platform adapter uses for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformVariant {
    /// Native multi-window shell with direct inter-process channels.
    #[default]
    Direct,
    /// Browser-extension host with a message-passing runtime.
    Extension,
}

impl std::str::FromStr for PlatformVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" | "electron" => Ok(Self::Direct),
            "extension" | "chrome" => Ok(Self::Extension),
            other => Err(format!("unknown platform variant: {other}")),
        }
    }
}
