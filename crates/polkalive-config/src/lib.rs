//! polkalive configuration.
//!
//! TOML-based configuration with validation. Every section has defaults, so
//! partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use polkalive_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LiveConfig, CONFIG_SCHEMA_VERSION};

use polkalive_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing, and
/// validate the result.
pub fn load_config() -> Result<LiveConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate the result.
pub fn load_config_from(path: &Path) -> Result<LiveConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &LiveConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = LiveConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"platform\""));
        assert!(json.contains("\"ipc\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"direct\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = LiveConfig::default();
        let json = config_to_json(&config);
        let parsed: LiveConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.ipc.push_capacity, 64);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polkalive.toml");
        std::fs::write(&path, "[ipc]\npush_capacity = 2\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
