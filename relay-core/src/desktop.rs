//! Capability surface the dispatcher drives.
//!
//! [`Desktop`] is the seam between the pipeline logic and the OS
//! binding layer: window lookup, activation, synthetic input, and the
//! clipboard. The Win32 implementation is fire-and-forget throughout
//! -- the OS cannot confirm that a paste or click had its intended
//! effect inside the target application, so none of these operations
//! carries a success result beyond what the OS itself reports.

use crate::window::WindowHandleInfo;

pub trait Desktop: Send + Sync {
    /// Find the target window by process name and exact title.
    /// Returns the null handle when nothing matches.
    fn locate(&self, process_name: &str, window_title: &str) -> WindowHandleInfo;

    /// Bring the window to the foreground and focus it, then wait out
    /// the settle interval. `false` means no delivery should follow.
    fn activate(&self, info: WindowHandleInfo) -> bool;

    /// Paste the clipboard into whichever window holds focus.
    fn paste(&self);

    /// Bottom-right corner of the window, screen coordinates.
    fn bottom_right(&self, info: WindowHandleInfo) -> Option<(i32, i32)>;

    /// Move the cursor and left-click at screen coordinates.
    fn click(&self, x: i32, y: i32);

    /// Stage text on the shared clipboard; returns after the attempt.
    fn set_clipboard_text(&self, text: &str, origin: &str);

    /// Current clipboard text, `None` on error or non-text content.
    fn clipboard_text(&self) -> Option<String>;
}

#[cfg(windows)]
pub use win32::Win32Desktop;

#[cfg(windows)]
mod win32 {
    use std::time::Duration;

    use super::Desktop;
    use crate::config::Timings;
    use crate::window::{self, WindowHandleInfo};
    use crate::{clipboard, input};

    /// Production [`Desktop`] backed by Win32 calls.
    pub struct Win32Desktop {
        settle: Duration,
    }

    impl Win32Desktop {
        pub fn new(timings: &Timings) -> Self {
            Self {
                settle: timings.activate_settle,
            }
        }
    }

    impl Desktop for Win32Desktop {
        fn locate(&self, process_name: &str, window_title: &str) -> WindowHandleInfo {
            window::locate(process_name, window_title)
        }

        fn activate(&self, info: WindowHandleInfo) -> bool {
            window::activate(info, self.settle)
        }

        fn paste(&self) {
            let injected = input::send_paste();
            if injected == 0 {
                log::warn!("paste chord injected no events");
            } else {
                log::info!("paste chord sent");
            }
        }

        fn bottom_right(&self, info: WindowHandleInfo) -> Option<(i32, i32)> {
            window::bottom_right(info)
        }

        fn click(&self, x: i32, y: i32) {
            let injected = input::send_click(x, y);
            if injected == 0 {
                log::warn!("click at ({x},{y}) injected no events");
            }
        }

        fn set_clipboard_text(&self, text: &str, origin: &str) {
            clipboard::set_text(text, origin);
        }

        fn clipboard_text(&self) -> Option<String> {
            clipboard::text()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::Desktop;
    use crate::window::WindowHandleInfo;

    /// Everything the pipeline did to the fake desktop, in order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Locate(String, String),
        Activate(isize),
        Paste,
        Click(i32, i32),
        SetClipboard(String, String),
    }

    /// Recording [`Desktop`] fake with scriptable outcomes.
    pub struct MockDesktop {
        /// Result of `locate`; `NULL` simulates "not found".
        pub window: WindowHandleInfo,
        /// Result of `activate` for non-null handles.
        pub activate_ok: bool,
        /// Result of `bottom_right`.
        pub rect: Option<(i32, i32)>,
        pub clipboard: Mutex<Option<String>>,
        pub events: Mutex<Vec<Event>>,
    }

    impl Default for MockDesktop {
        fn default() -> Self {
            Self {
                window: WindowHandleInfo { handle: 1, pid: 100 },
                activate_ok: true,
                rect: Some((500, 400)),
                clipboard: Mutex::new(None),
                events: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockDesktop {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }

        fn record(&self, event: Event) {
            self.events.lock().push(event);
        }
    }

    impl Desktop for MockDesktop {
        fn locate(&self, process_name: &str, window_title: &str) -> WindowHandleInfo {
            self.record(Event::Locate(process_name.into(), window_title.into()));
            self.window
        }

        fn activate(&self, info: WindowHandleInfo) -> bool {
            self.record(Event::Activate(info.handle));
            !info.is_null() && self.activate_ok
        }

        fn paste(&self) {
            self.record(Event::Paste);
        }

        fn bottom_right(&self, _info: WindowHandleInfo) -> Option<(i32, i32)> {
            self.rect
        }

        fn click(&self, x: i32, y: i32) {
            self.record(Event::Click(x, y));
        }

        fn set_clipboard_text(&self, text: &str, origin: &str) {
            self.record(Event::SetClipboard(text.into(), origin.into()));
            *self.clipboard.lock() = Some(text.to_owned());
        }

        fn clipboard_text(&self) -> Option<String> {
            self.clipboard.lock().clone()
        }
    }
}
