//! System clipboard, read by Ctrl+V.

use log::warn;

/// Where pasted text comes from.
pub trait ClipboardSource {
    /// Current clipboard text, `None` when there is none or it can't be read.
    fn get_text(&mut self) -> Option<String>;
}

/// arboard-backed clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardSource for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        if self.clipboard.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!("Clipboard unavailable: {}", e);
                    return None;
                }
            }
        }
        let clipboard = self.clipboard.as_mut()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to read clipboard: {}", e);
                None
            }
        }
    }
}
