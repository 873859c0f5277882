use std::sync::Mutex;

use polkalive_common::PlatformError;

/// Destination for copy-to-clipboard requests.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), PlatformError>;
    fn get_text(&self) -> Result<String, PlatformError>;
}

/// The OS clipboard, backed by `arboard`.
///
/// A fresh `arboard::Clipboard` is opened per call so the sink can be shared
/// across threads.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, PlatformError> {
        arboard::Clipboard::new().map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), PlatformError> {
        Self::open()?
            .set_text(text.to_owned())
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }

    fn get_text(&self) -> Result<String, PlatformError> {
        Self::open()?
            .get_text()
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }
}

/// In-process clipboard for headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), PlatformError> {
        let mut slot = self
            .text
            .lock()
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))?;
        *slot = Some(text.to_owned());
        Ok(())
    }

    fn get_text(&self) -> Result<String, PlatformError> {
        self.text
            .lock()
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))?
            .clone()
            .ok_or_else(|| PlatformError::ClipboardError("clipboard is empty".into()))
    }
}
