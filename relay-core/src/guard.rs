//! Single-flight guard around the send pipeline.
//!
//! Admits at most one in-progress send at a time. Acquisition is
//! non-blocking: a second caller is told to abort, never queued.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide idle/busy latch.
///
/// Transitions idle -> busy only when idle; busy -> idle
/// unconditionally on [`release`](SendGuard::release).
#[derive(Debug, Default)]
pub struct SendGuard {
    busy: AtomicBool,
}

impl SendGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip to busy. Returns `false` (caller should abort) if a guarded
    /// operation is already in progress.
    pub fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Flip back to idle, regardless of how the guarded operation ended.
    pub fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Run `f` under the guard, releasing on every exit path.
    ///
    /// Returns `false` without running `f` when the guard is busy.
    pub fn run<F: FnOnce()>(&self, f: F) -> bool {
        if !self.try_acquire() {
            return false;
        }
        struct Release<'a>(&'a SendGuard);
        impl Drop for Release<'_> {
            fn drop(&mut self) {
                self.0.release();
            }
        }
        let _release = Release(self);
        f();
        true
    }
}
