//! Error types for `relay_core`.
//!
//! Almost nothing in this crate propagates errors: not-found conditions
//! and OS-automation failures are logged at the call site and mapped to
//! a null handle or an aborted dispatch. [`RelayError`] exists for the
//! few operations that genuinely fail upward (listener bind/serve) and
//! for carrying OS error text into log lines.

use thiserror::Error;

/// Top-level error type for the `relay_core` library.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Window enumeration or lookup failure.
    #[error("WindowError: {0}")]
    Window(String),

    /// Clipboard open/read/write failure.
    #[error("ClipboardError: {0}")]
    Clipboard(String),

    /// HTTP listener bind or serve failure.
    #[error("ServerError: {0}")]
    Server(String),
}

#[cfg(windows)]
impl From<windows::core::Error> for RelayError {
    fn from(err: windows::core::Error) -> Self {
        RelayError::Window(format!("Win32 error: {err}"))
    }
}
