//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod helpers;
mod ipc;

#[cfg(test)]
mod tests;

use crate::schema::LiveConfig;
use polkalive_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LiveConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    ipc::validate_ipc(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
