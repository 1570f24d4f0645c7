//! `relay_core` -- core library for the winrelay message bridge.
//!
//! Relays text payloads received over a loopback HTTP endpoint into one
//! target window of a running GUI application: the payload is staged on
//! the system clipboard, the window is located by process name and exact
//! title, forced to the foreground, and the content delivered with a
//! synthetic paste followed by a click on the send button.
//!
//! Win32-backed modules are gated on `cfg(windows)`; everything else is
//! portable and testable against the [`desktop::Desktop`] trait.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `RelayError` enum via `thiserror` |
//! | [`config`] | Target window, port, and timing configuration |
//! | [`guard`] | Single-flight latch around the send pipeline |
//! | [`desktop`] | Capability surface trait + Win32 implementation |
//! | [`clipboard`] | Synchronous clipboard relay on a dedicated worker |
//! | [`window`] | Window lookup and activation via `EnumWindows` |
//! | [`dispatch`] | Locate -> activate -> paste -> click orchestration |
//! | [`server`] | Loopback HTTP ingestion endpoint (axum) |

pub mod clipboard;
pub mod config;
pub mod desktop;
pub mod dispatch;
pub mod errors;
pub mod guard;
pub mod server;
pub mod window;

#[cfg(windows)]
pub mod input;
