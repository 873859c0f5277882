//! TOML config file loading and creation.

mod loader;
mod paths;
mod template;

#[cfg(test)]
mod tests;

pub use loader::{load_default, load_from_path, parse_toml};
pub use paths::{config_path_in, create_default_config, default_config_path};
