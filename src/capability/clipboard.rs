//! Clipboard writer backed by `arboard`.
//!
//! A short-lived [`arboard::Clipboard`] is opened per call; the handle is
//! not `Send` on every platform, so it is never stored.

use arboard::Clipboard;

use super::{CapabilityError, ClipboardWriter};

#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardClipboard;

impl ArboardClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardWriter for ArboardClipboard {
    /// Replace the clipboard contents with `text`.  Empty text is ignored so
    /// copying an empty result never wipes what the user had.
    fn copy(&self, text: &str) -> Result<(), CapabilityError> {
        if text.is_empty() {
            return Ok(());
        }
        let mut clipboard =
            Clipboard::new().map_err(|e| CapabilityError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| CapabilityError::Clipboard(e.to_string()))?;
        log::debug!("clipboard: copied {} chars", text.chars().count());
        Ok(())
    }
}
