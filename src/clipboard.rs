//! Copying page links to the system clipboard.
//!
//! Uses the native clipboard through arboard when one is reachable and falls
//! back to an OSC 52 escape sequence, which most modern terminals forward to
//! the host clipboard.

use std::io::Write;
use std::sync::Mutex;

use arboard::Clipboard;
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use tracing::{debug, warn};

/// The native clipboard must outlive the copy on X11, so it is kept here.
static CLIPBOARD: Mutex<Option<Clipboard>> = Mutex::new(None);

/// Clipboard operation errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to acquire clipboard lock")]
    Lock,

    #[error("Failed to copy to clipboard: {0}")]
    Copy(String),
}

/// Which mechanism carried a successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    Native,
    Osc52,
}

/// Copy text to the clipboard.
pub fn copy(text: &str) -> Result<ClipboardBackend, ClipboardError> {
    match copy_native(text) {
        Ok(()) => {
            debug!("Copied via native clipboard");
            Ok(ClipboardBackend::Native)
        }
        Err(e) => {
            warn!(error = %e, "Native clipboard unavailable, using OSC 52");
            let mut stdout = std::io::stdout();
            write_osc52(&mut stdout, text)?;
            Ok(ClipboardBackend::Osc52)
        }
    }
}

fn copy_native(text: &str) -> Result<(), ClipboardError> {
    let mut guard = CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)?;
    if guard.is_none() {
        *guard = Some(Clipboard::new().map_err(|e| ClipboardError::Copy(e.to_string()))?);
    }
    match guard.as_mut() {
        Some(clipboard) => clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Copy(e.to_string())),
        None => Err(ClipboardError::Copy("clipboard unavailable".to_string())),
    }
}

/// OSC 52 format: `ESC ] 52 ; c ; <base64> ESC \`
fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text))
}

fn write_osc52(out: &mut impl Write, text: &str) -> Result<(), ClipboardError> {
    out.write_all(osc52_sequence(text).as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| ClipboardError::Copy(format!("Failed to write OSC 52: {}", e)))
}
