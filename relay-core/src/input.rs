//! Synthetic keyboard and mouse input via Win32 `SendInput`.
//!
//! The relay only needs two gestures: the paste chord that drops the
//! clipboard into the focused editor, and a left-click on the send
//! button. Both are fire-and-forget -- the target application gives no
//! feedback, so callers get an injected-event count, not a success
//! result.

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
    VK_CONTROL, VK_V,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};

/// Maximum chord length (the relay only ever sends two keys).
const MAX_CHORD_KEYS: usize = 8;

/// Pre-computed size of `INPUT` struct for `SendInput` calls.
const INPUT_SIZE: i32 = std::mem::size_of::<INPUT>() as i32;

/// Flags for absolute mouse positioning on the virtual desktop.
const ABSOLUTE_MOVE: MOUSE_EVENT_FLAGS =
    MOUSE_EVENT_FLAGS(MOUSEEVENTF_ABSOLUTE.0 | MOUSEEVENTF_MOVE.0 | MOUSEEVENTF_VIRTUALDESK.0);

/// Query virtual screen dimensions and origin (covers all monitors).
///
/// Returns `(origin_x, origin_y, width, height)`. On multi-monitor
/// setups where a monitor is left of or above the primary, origin can
/// be negative.
fn screen_geometry() -> (i32, i32, i32, i32) {
    unsafe {
        let x = GetSystemMetrics(SM_XVIRTUALSCREEN);
        let y = GetSystemMetrics(SM_YVIRTUALSCREEN);
        let w = GetSystemMetrics(SM_CXVIRTUALSCREEN);
        let h = GetSystemMetrics(SM_CYVIRTUALSCREEN);
        // Fallback: GetSystemMetrics returns 0 on failure
        if w > 0 && h > 0 {
            (x, y, w, h)
        } else {
            (0, 0, 1920, 1080)
        }
    }
}

fn virtual_key_input(vk: u16, key_up: bool) -> INPUT {
    let flags = if key_up {
        KEYEVENTF_KEYUP
    } else {
        KEYBD_EVENT_FLAGS(0)
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn mouse_input(abs_x: i32, abs_y: i32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: abs_x,
                dy: abs_y,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Convert pixel coordinates to 0..65535 normalised space for the
/// virtual desktop, accounting for a possibly negative origin.
fn normalise_coords(x: i32, y: i32) -> (i32, i32) {
    let (origin_x, origin_y, screen_w, screen_h) = screen_geometry();

    if screen_w <= 1 || screen_h <= 1 {
        return (0, 0);
    }

    let abs_x = (((x - origin_x) as i64 * 65535) / (screen_w as i64 - 1)).clamp(0, 65535) as i32;
    let abs_y = (((y - origin_y) as i64 * 65535) / (screen_h as i64 - 1)).clamp(0, 65535) as i32;
    (abs_x, abs_y)
}

/// Send a key chord: press all keys in order, release in reverse, in a
/// single atomic `SendInput` call.
///
/// Returns the number of events injected; 0 if `vk_codes` is empty or
/// exceeds `MAX_CHORD_KEYS`.
pub fn send_chord(vk_codes: &[u16]) -> u32 {
    if vk_codes.is_empty() || vk_codes.len() > MAX_CHORD_KEYS {
        return 0;
    }

    let mut inputs: Vec<INPUT> = Vec::with_capacity(vk_codes.len() * 2);

    for &vk in vk_codes {
        inputs.push(virtual_key_input(vk, false));
    }
    for &vk in vk_codes.iter().rev() {
        inputs.push(virtual_key_input(vk, true));
    }

    unsafe { SendInput(&inputs, INPUT_SIZE) }
}

/// Send Ctrl+V to whichever window currently holds keyboard focus.
pub fn send_paste() -> u32 {
    send_chord(&[VK_CONTROL.0, VK_V.0])
}

/// Move the cursor to absolute screen coordinates and left-click there.
///
/// Returns the number of events injected (3 on success: move, press,
/// release).
pub fn send_click(x: i32, y: i32) -> u32 {
    let (abs_x, abs_y) = normalise_coords(x, y);

    let inputs = [
        mouse_input(abs_x, abs_y, ABSOLUTE_MOVE),
        mouse_input(
            abs_x,
            abs_y,
            MOUSE_EVENT_FLAGS(ABSOLUTE_MOVE.0 | MOUSEEVENTF_LEFTDOWN.0),
        ),
        mouse_input(
            abs_x,
            abs_y,
            MOUSE_EVENT_FLAGS(ABSOLUTE_MOVE.0 | MOUSEEVENTF_LEFTUP.0),
        ),
    ];

    unsafe { SendInput(&inputs, INPUT_SIZE) }
}
