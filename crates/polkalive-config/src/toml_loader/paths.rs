//! Where the polkalive config file lives.

use std::io;
use std::path::{Path, PathBuf};

use polkalive_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "polkalive";
const FILE_NAME: &str = "polkalive.toml";

/// `polkalive/polkalive.toml` under `base`.
pub fn config_path_in(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(FILE_NAME)
}

/// The config file under the user's config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| config_path_in(&base))
        .ok_or_else(|| ConfigError::ParseError("no user config directory on this system".into()))
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_err = |e: io::Error| ConfigError::ParseError(format!("cannot write {}: {e}", path.display()));

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    std::fs::write(path, default_config_toml()).map_err(write_err)?;

    info!(path = %path.display(), "wrote default polkalive config");
    Ok(())
}
