//! Runtime configuration for the relay.
//!
//! All fixed waits in the pipeline are pragmatic substitutes for
//! readiness signals the OS does not provide; they live here as named
//! values so call sites never embed raw durations.

use std::time::Duration;

/// Delay constants used across the pipeline.
#[derive(Debug, Clone)]
pub struct Timings {
    /// Wait after issuing the activation sequence, before the paste.
    /// There is no portable "activation complete" signal, so this is a
    /// fixed settle interval rather than a poll.
    pub activate_settle: Duration,
    /// Wait between acknowledging a POST and running its dispatch,
    /// giving the clipboard set and any in-progress UI work time to
    /// finish.
    pub dispatch_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            activate_settle: Duration::from_millis(1000),
            dispatch_delay: Duration::from_millis(2000),
        }
    }
}

/// Target window and listener configuration, injected into the HTTP
/// endpoint and dispatcher rather than read from process-wide statics.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Process name of the target application (without `.exe`).
    pub process_name: String,
    /// Exact window title to match. No trimming, no case folding --
    /// deliberately brittle for compatibility with the consumer app.
    pub window_title: String,
    /// Loopback port for the HTTP listener.
    pub port: u16,
    /// When set, the HTTP-triggered delayed dispatch takes the same
    /// single-flight guard as the manual path. Off by default: the two
    /// paths historically run unguarded against each other.
    pub guard_http_dispatch: bool,
    pub timings: Timings,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            process_name: "weixin".to_owned(),
            window_title: String::new(),
            port: 58080,
            guard_http_dispatch: false,
            timings: Timings::default(),
        }
    }
}
