//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use polkalive_common::{ConfigError, PlatformVariant};
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("polkalive.toml");
    let result = load_from_path(&missing);
    assert!(matches!(result, Err(ConfigError::FileNotFound(path)) if path == missing));
}

#[test]
fn empty_file_means_every_default() {
    let config = parse_toml("").unwrap();
    assert_eq!(config.platform.variant, PlatformVariant::Direct);
    assert_eq!(config.ipc.push_capacity, 64);
}

#[test]
fn config_path_nests_app_dir() {
    let path = config_path_in(Path::new("/home/dot/.config"));
    assert_eq!(path, Path::new("/home/dot/.config/polkalive/polkalive.toml"));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polkalive.toml");
    std::fs::write(
        &path,
        r#"
[platform]
variant = "extension"

[ipc]
push_capacity = 256
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.platform.variant, PlatformVariant::Extension);
    assert_eq!(config.ipc.push_capacity, 256);
    // Defaults preserved
    assert_eq!(config.ipc.event_bus_capacity, 64);
    assert!(config.platform.system_clipboard);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polkalive.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_keeps_them() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polkalive.toml");
    std::fs::write(
        &path,
        r#"
[ipc]
event_bus_capacity = 1
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.ipc.event_bus_capacity, 1);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polkalive").join("polkalive.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.platform.variant, PlatformVariant::Direct);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::LiveConfig;

    let content = default_config_toml();
    let config: LiveConfig = toml::from_str(&content).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_uses_user_config_dir() {
    // Skipped where the system has no user config directory.
    if let Some(base) = dirs::config_dir() {
        assert_eq!(default_config_path().unwrap(), config_path_in(&base));
    }
}
