//! Reading `polkalive.toml`.

use std::io::ErrorKind;
use std::path::Path;

use polkalive_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::LiveConfig;
use crate::validation;

/// Parse config text. Out-of-range values are reported as a warning and kept,
/// so a typo in `[ipc]` never stops a window from starting.
pub fn parse_toml(content: &str) -> Result<LiveConfig, ConfigError> {
    let config: LiveConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    if let Err(e) = validation::validate(&config) {
        warn!(error = %e, "config has out-of-range values, keeping them");
    }
    Ok(config)
}

/// Read and parse the file at `path`.
pub fn load_from_path(path: &Path) -> Result<LiveConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!("cannot read {}: {e}", path.display())))
        }
    };
    let config = parse_toml(&content)?;
    info!(path = %path.display(), variant = ?config.platform.variant, "config loaded");
    Ok(config)
}

/// Load the user's config, writing the template on first run.
pub fn load_default() -> Result<LiveConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(LiveConfig::default())
        }
        other => other,
    }
}
