//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# polkalive configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[platform]
# Adapter variant: "direct" (multi-window desktop shell) or
# "extension" (browser-extension runtime). Chosen once at startup.
variant = "direct"
# system_clipboard = true   # false keeps copies in memory (headless)

[ipc]
# event_bus_capacity = 64   # 16-4096
# push_capacity = 64        # 16-4096

[logging]
# level = "INFO"            # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
