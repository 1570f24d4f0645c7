//! Synchronous clipboard relay.
//!
//! Clipboard access keeps its own thread affinity on Windows, so every
//! operation runs on a dedicated short-lived worker thread and the
//! caller joins it before returning. After [`set_text`] returns, the
//! set has been *attempted*; downstream steps may still paste stale
//! content if the clipboard was busy or denied. That risk is accepted
//! -- failures are logged, never raised.

use std::thread;

use arboard::Clipboard;

use crate::errors::RelayError;

fn write_text(text: &str) -> Result<(), RelayError> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| RelayError::Clipboard(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text.to_owned())
        .map_err(|e| RelayError::Clipboard(format!("clipboard write failed: {e}")))
}

/// Place `text` on the system clipboard from a dedicated worker thread,
/// blocking until the attempt finishes.
///
/// `origin` tags the log line with which path staged the payload
/// ("post" for HTTP, "copy" for the manual trigger).
pub fn set_text(text: &str, origin: &str) {
    let payload = text.to_owned();
    let tag = origin.to_owned();

    let worker = thread::Builder::new()
        .name("clipboard".into())
        .spawn(move || match write_text(&payload) {
            Ok(()) => log::info!("clipboard set|len:{}|{tag}", payload.len()),
            Err(err) => log::error!("{err}|{tag}"),
        });

    match worker {
        Ok(handle) => {
            if handle.join().is_err() {
                log::error!("clipboard worker panicked|{origin}");
            }
        }
        Err(err) => log::error!("failed to spawn clipboard worker: {err}|{origin}"),
    }
}

/// Read the current clipboard text, again via a joined worker thread.
///
/// `None` when the clipboard is unavailable or holds no text.
pub fn text() -> Option<String> {
    let worker = thread::Builder::new()
        .name("clipboard".into())
        .spawn(|| Clipboard::new().ok().and_then(|mut c| c.get_text().ok()))
        .ok()?;

    worker.join().ok().flatten()
}
