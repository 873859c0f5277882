use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One key of the shared boolean state replicated across every window.
///
/// The vocabulary is closed: adding a flag means adding a variant here and
/// to [`SyncId::ALL`], which every total mapping is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyncId {
    #[serde(rename = "account:importing")]
    AccountImporting,
    #[serde(rename = "backup:exporting")]
    BackupExporting,
    #[serde(rename = "backup:importing")]
    BackupImporting,
    #[serde(rename = "extrinsic:building")]
    ExtrinsicBuilding,
    #[serde(rename = "mode:connected")]
    ModeConnected,
    #[serde(rename = "mode:online")]
    ModeOnline,
    #[serde(rename = "wc:account:approved")]
    WcAccountApproved,
    #[serde(rename = "wc:account:verifying")]
    WcAccountVerifying,
    #[serde(rename = "wc:connecting")]
    WcConnecting,
    #[serde(rename = "wc:disconnecting")]
    WcDisconnecting,
    #[serde(rename = "wc:initialized")]
    WcInitialized,
    #[serde(rename = "wc:session:restored")]
    WcSessionRestored,
}

impl SyncId {
    /// Every key, in declaration order.
    pub const ALL: [SyncId; 12] = [
        SyncId::AccountImporting,
        SyncId::BackupExporting,
        SyncId::BackupImporting,
        SyncId::ExtrinsicBuilding,
        SyncId::ModeConnected,
        SyncId::ModeOnline,
        SyncId::WcAccountApproved,
        SyncId::WcAccountVerifying,
        SyncId::WcConnecting,
        SyncId::WcDisconnecting,
        SyncId::WcInitialized,
        SyncId::WcSessionRestored,
    ];

    /// Wire name of the key, e.g. `"mode:online"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncId::AccountImporting => "account:importing",
            SyncId::BackupExporting => "backup:exporting",
            SyncId::BackupImporting => "backup:importing",
            SyncId::ExtrinsicBuilding => "extrinsic:building",
            SyncId::ModeConnected => "mode:connected",
            SyncId::ModeOnline => "mode:online",
            SyncId::WcAccountApproved => "wc:account:approved",
            SyncId::WcAccountVerifying => "wc:account:verifying",
            SyncId::WcConnecting => "wc:connecting",
            SyncId::WcDisconnecting => "wc:disconnecting",
            SyncId::WcInitialized => "wc:initialized",
            SyncId::WcSessionRestored => "wc:session:restored",
        }
    }
}

impl fmt::Display for SyncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SyncId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown sync id: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_keys_are_distinct() {
        let names: HashSet<&str> = SyncId::ALL.iter().map(|id| id.as_str()).collect();
        assert_eq!(names.len(), SyncId::ALL.len());
    }

    #[test]
    fn serde_uses_wire_names() {
        for id in SyncId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("wc:connecting".parse::<SyncId>(), Ok(SyncId::WcConnecting));
        assert_eq!(
            "wc:session:restored".parse::<SyncId>(),
            Ok(SyncId::WcSessionRestored)
        );
        assert!("mode:offline".parse::<SyncId>().is_err());
        assert!("".parse::<SyncId>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(SyncId::ModeOnline.to_string(), "mode:online");
    }
}
