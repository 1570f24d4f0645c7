//! Window lookup and activation via the Win32 API.
//!
//! Lookup enumerates the target process's top-level windows and matches
//! captions by exact string equality -- no trimming, no case folding.
//! That is deliberately brittle (a trailing space in the title means no
//! match) but mirrors how the consumer application is addressed.
//!
//! All functions return owned values, never raw handles.

#[cfg(windows)]
use std::ffi::OsString;
#[cfg(windows)]
use std::os::windows::ffi::OsStringExt;
#[cfg(windows)]
use std::time::Duration;

#[cfg(windows)]
use sysinfo::{ProcessesToUpdate, System};
#[cfg(windows)]
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE, WPARAM};
#[cfg(windows)]
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
    SendMessageW, SetForegroundWindow, ShowWindow, SW_RESTORE, WA_ACTIVE, WM_ACTIVATE,
};

#[cfg(windows)]
use crate::errors::RelayError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Handle of a located window plus its owning process id.
///
/// A plain value snapshot taken at discovery time; the window itself
/// belongs to the OS, so there is nothing to release. `handle == 0` is
/// the null handle and means "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandleInfo {
    pub handle: isize,
    pub pid: u32,
}

impl WindowHandleInfo {
    pub const NULL: Self = Self { handle: 0, pid: 0 };

    pub fn is_null(&self) -> bool {
        self.handle == 0
    }
}

// ---------------------------------------------------------------------------
// Process name matching
// ---------------------------------------------------------------------------

/// Match a running process's image name against the configured target.
///
/// Windows convention: names compare case-insensitively, and callers
/// usually omit the `.exe` suffix the image name carries.
#[cfg_attr(not(windows), allow(dead_code))]
fn process_name_matches(actual: &str, wanted: &str) -> bool {
    if actual.eq_ignore_ascii_case(wanted) {
        return true;
    }
    match actual.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("exe") => stem.eq_ignore_ascii_case(wanted),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Win32 helpers
// ---------------------------------------------------------------------------

/// Read the window caption.
#[cfg(windows)]
fn read_window_title(hwnd: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; (len + 1) as usize];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
    if copied <= 0 {
        return String::new();
    }
    OsString::from_wide(&buf[..copied as usize])
        .to_string_lossy()
        .into_owned()
}

/// Pids of every running process whose name matches `process_name`.
#[cfg(windows)]
fn pids_for_process(process_name: &str) -> Vec<u32> {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::All, true);

    let mut pids: Vec<u32> = sys
        .processes()
        .iter()
        .filter(|(_, process)| {
            process_name_matches(&process.name().to_string_lossy(), process_name)
        })
        .map(|(pid, _)| pid.as_u32())
        .collect();
    // Deterministic process-list order for "first match wins".
    pids.sort_unstable();
    pids
}

#[cfg(windows)]
struct EnumState {
    pid: u32,
    handles: Vec<HWND>,
}

/// Callback for EnumWindows that collects windows owned by one process.
#[cfg(windows)]
unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let state = unsafe { &mut *(lparam.0 as *mut EnumState) };

    let mut pid: u32 = 0;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    if pid == state.pid {
        state.handles.push(hwnd);
    }

    TRUE // continue enumeration
}

/// Enumerate the top-level windows owned by `pid`.
#[cfg(windows)]
fn windows_for_process(pid: u32) -> Result<Vec<isize>, RelayError> {
    let mut state = EnumState {
        pid,
        handles: Vec::new(),
    };
    let result = unsafe {
        EnumWindows(
            Some(enum_callback),
            LPARAM(&mut state as *mut EnumState as isize),
        )
    };

    result.map_err(|e| RelayError::Window(format!("EnumWindows failed: {e}")))?;

    Ok(state.handles.iter().map(|h| h.0 as isize).collect())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Find the target window by process name and exact title.
///
/// Returns the first caption match, in enumeration order, from the
/// first matching process that yields one. Not-found conditions and
/// enumeration errors are logged and collapse to
/// [`WindowHandleInfo::NULL`]; this function never fails upward.
#[cfg(windows)]
pub fn locate(process_name: &str, window_title: &str) -> WindowHandleInfo {
    match try_locate(process_name, window_title) {
        Ok(info) => info,
        Err(err) => {
            log::error!("window lookup failed: {err}|{process_name}|{window_title}");
            WindowHandleInfo::NULL
        }
    }
}

#[cfg(windows)]
fn try_locate(process_name: &str, window_title: &str) -> Result<WindowHandleInfo, RelayError> {
    let pids = pids_for_process(process_name);
    if pids.is_empty() {
        log::info!("process not found: {process_name}");
        return Ok(WindowHandleInfo::NULL);
    }

    for pid in &pids {
        for handle in windows_for_process(*pid)? {
            let title = read_window_title(HWND(handle as *mut core::ffi::c_void));
            if title == window_title {
                log::info!("window found: {window_title}|handle:{handle}|pid:{pid}");
                return Ok(WindowHandleInfo {
                    handle,
                    pid: *pid,
                });
            }
        }
    }

    log::info!(
        "window not found: {window_title}|{process_name}|process count: {}",
        pids.len()
    );
    Ok(WindowHandleInfo::NULL)
}

/// Bring the window to the foreground and give it keyboard focus.
///
/// Restore-if-minimized -> request foreground -> WM_ACTIVATE -> set
/// focus, each best-effort with no individual success check, then a
/// fixed settle wait. Returns `false` only for a null handle; the OS
/// offers no reliable signal that activation actually took.
#[cfg(windows)]
pub fn activate(info: WindowHandleInfo, settle: Duration) -> bool {
    if info.is_null() {
        return false;
    }

    let hwnd = HWND(info.handle as *mut core::ffi::c_void);
    unsafe {
        let _ = ShowWindow(hwnd, SW_RESTORE);
        let _ = SetForegroundWindow(hwnd);
        SendMessageW(hwnd, WM_ACTIVATE, WPARAM(WA_ACTIVE as usize), LPARAM(0));
        let _ = SetFocus(hwnd);
    }

    // Give the compositor and the target's window procedure time to
    // process the activation before anything is pasted at it.
    std::thread::sleep(settle);

    log::info!("window activated|handle:{}|pid:{}", info.handle, info.pid);
    true
}

/// Bottom-right corner of the window rectangle in screen coordinates.
///
/// `None` when the handle is null or the rect query fails.
#[cfg(windows)]
pub fn bottom_right(info: WindowHandleInfo) -> Option<(i32, i32)> {
    if info.is_null() {
        return None;
    }

    let hwnd = HWND(info.handle as *mut core::ffi::c_void);
    let mut rect = RECT::default();
    match unsafe { GetWindowRect(hwnd, &mut rect) } {
        Ok(()) => Some((rect.right, rect.bottom)),
        Err(err) => {
            log::warn!("GetWindowRect failed: {err}|handle:{}", info.handle);
            None
        }
    }
}
