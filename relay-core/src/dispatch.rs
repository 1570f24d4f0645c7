//! Message delivery orchestration.
//!
//! One dispatch is strictly sequential: locate -> activate -> paste ->
//! click the send button. The clipboard must already hold the payload
//! when `dispatch` runs; the HTTP path sets it just before scheduling,
//! the manual path sets it and then asks for the non-empty check.
//!
//! Beyond the paste there is no feedback channel into the target
//! application. A dispatch that reaches the click is done, whether or
//! not the message actually went out.

use crate::desktop::Desktop;
use crate::guard::SendGuard;

/// Offset from the target window's bottom-right corner to its send
/// button. Tuned for one specific consumer application; a different
/// window shape needs different numbers.
pub const SEND_BUTTON_X_OFFSET: i32 = 62;
pub const SEND_BUTTON_Y_OFFSET: i32 = 31;

/// One delivery attempt. Consumed synchronously, never persisted.
#[derive(Debug, Clone)]
pub struct DispatchRequest<'a> {
    pub process_name: &'a str,
    pub window_title: &'a str,
    /// Abort unless the clipboard currently holds non-empty text.
    /// The HTTP path skips this -- it has just set the clipboard
    /// itself.
    pub verify_clipboard: bool,
}

/// Run one locate -> activate -> paste -> click sequence.
///
/// Every failure short-circuits the rest of the attempt and has
/// already been logged where it happened; nothing is retried and
/// nothing propagates.
pub fn dispatch(desktop: &dyn Desktop, request: DispatchRequest<'_>) {
    let DispatchRequest {
        process_name,
        window_title,
        verify_clipboard,
    } = request;

    if process_name.is_empty() || window_title.is_empty() {
        log::info!("process name or window title empty|{process_name}|{window_title}");
        return;
    }

    if verify_clipboard {
        match desktop.clipboard_text() {
            Some(text) if !text.is_empty() => {
                log::info!("clipboard holds {} chars", text.len());
            }
            _ => {
                log::warn!("clipboard holds no text, dispatch aborted");
                return;
            }
        }
    }

    let info = desktop.locate(process_name, window_title);
    if info.is_null() {
        return; // already logged by the locator
    }

    if !desktop.activate(info) {
        return;
    }

    desktop.paste();

    match desktop.bottom_right(info) {
        Some((right, bottom)) => {
            desktop.click(right - SEND_BUTTON_X_OFFSET, bottom - SEND_BUTTON_Y_OFFSET);
        }
        None => {
            log::warn!("window rect unavailable, send click skipped|handle:{}", info.handle);
        }
    }
}

/// Manual trigger path: stage `message` on the clipboard, then deliver
/// it under the single-flight guard with the clipboard check enabled.
///
/// Returns `false` when the message is empty or another send is in
/// progress.
pub fn send_manual(
    desktop: &dyn Desktop,
    guard: &SendGuard,
    process_name: &str,
    window_title: &str,
    message: &str,
) -> bool {
    if message.is_empty() {
        log::info!("empty message, nothing to send");
        return false;
    }

    let admitted = guard.run(|| {
        desktop.set_clipboard_text(message, "copy");
        dispatch(
            desktop,
            DispatchRequest {
                process_name,
                window_title,
                verify_clipboard: true,
            },
        );
    });

    if !admitted {
        log::warn!("another send is in progress, manual send rejected");
    }
    admitted
}
