use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level application window. Each window runs as its own process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowId {
    Main,
    Import,
    Action,
    Settings,
    OpenGov,
    Tabs,
}

impl WindowId {
    pub const ALL: [WindowId; 6] = [
        WindowId::Main,
        WindowId::Import,
        WindowId::Action,
        WindowId::Settings,
        WindowId::OpenGov,
        WindowId::Tabs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowId::Main => "main",
            WindowId::Import => "import",
            WindowId::Action => "action",
            WindowId::Settings => "settings",
            WindowId::OpenGov => "openGov",
            WindowId::Tabs => "tabs",
        }
    }

    /// The channel a secondary window uses to talk to main. `None` for main.
    pub fn channel_role(&self) -> Option<ChannelRole> {
        ChannelRole::ALL.into_iter().find(|r| r.window() == *self)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named channel between the main window and one secondary window.
///
/// Both ends use the same role: main binds its end under the role, and the
/// secondary window binds the opposite end under the same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelRole {
    MainFromAction,
    MainFromImport,
    MainFromOpenGov,
    MainFromTabs,
    MainFromSettings,
}

impl ChannelRole {
    pub const ALL: [ChannelRole; 5] = [
        ChannelRole::MainFromAction,
        ChannelRole::MainFromImport,
        ChannelRole::MainFromOpenGov,
        ChannelRole::MainFromTabs,
        ChannelRole::MainFromSettings,
    ];

    /// The secondary window on the far side of main.
    pub fn window(&self) -> WindowId {
        match self {
            ChannelRole::MainFromAction => WindowId::Action,
            ChannelRole::MainFromImport => WindowId::Import,
            ChannelRole::MainFromOpenGov => WindowId::OpenGov,
            ChannelRole::MainFromTabs => WindowId::Tabs,
            ChannelRole::MainFromSettings => WindowId::Settings,
        }
    }
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "main<-{}", self.window())
    }
}

/// Identifier of a view that can be opened as a tab (e.g. `"settings"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<WindowId> for TabId {
    fn from(w: WindowId) -> Self {
        Self(w.as_str().to_string())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_secondary_window_has_one_role() {
        for w in WindowId::ALL {
            let role = w.channel_role();
            if w == WindowId::Main {
                assert!(role.is_none());
            } else {
                assert_eq!(role.unwrap().window(), w);
            }
        }
    }

    #[test]
    fn roles_map_to_distinct_windows() {
        let windows: HashSet<WindowId> = ChannelRole::ALL.iter().map(|r| r.window()).collect();
        assert_eq!(windows.len(), ChannelRole::ALL.len());
        assert!(!windows.contains(&WindowId::Main));
    }

    #[test]
    fn window_id_serializes_camel_case() {
        let json = serde_json::to_string(&WindowId::OpenGov).unwrap();
        assert_eq!(json, "\"openGov\"");
        let parsed: WindowId = serde_json::from_str("\"settings\"").unwrap();
        assert_eq!(parsed, WindowId::Settings);
    }

    #[test]
    fn role_display() {
        assert_eq!(ChannelRole::MainFromOpenGov.to_string(), "main<-openGov");
    }

    #[test]
    fn tab_id_is_transparent() {
        let tab = TabId::from("settings");
        assert_eq!(serde_json::to_string(&tab).unwrap(), "\"settings\"");
        assert_eq!(TabId::from(WindowId::Import).as_str(), "import");
    }
}
