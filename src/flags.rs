//! Process-wide reader flags
//!
//! Two flags are shared with the rest of the application: "is reading"
//! (suppresses unrelated UI such as navigation prompts while a session is
//! active) and "show controls" (the reader's transient overlay). Ownership is
//! exclusive to the mounted reading session; at most one session is mounted
//! at a time. The session acquires a scoped guard on mount, and the guard's
//! Drop releases both flags on every exit path, including panics during
//! session setup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct Inner {
    is_reading: AtomicBool,
    show_controls: AtomicBool,
}

/// Shared handle to the process-wide reader flags
#[derive(Debug, Clone, Default)]
pub struct ReaderFlags {
    inner: Arc<Inner>,
}

impl ReaderFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reading session is currently mounted
    pub fn is_reading(&self) -> bool {
        self.inner.is_reading.load(Ordering::SeqCst)
    }

    /// Whether the controls overlay is currently shown
    pub fn show_controls(&self) -> bool {
        self.inner.show_controls.load(Ordering::SeqCst)
    }

    /// Toggle the controls overlay. Only the mounted session calls this.
    pub fn set_show_controls(&self, visible: bool) {
        self.inner.show_controls.store(visible, Ordering::SeqCst);
    }

    /// Mark a reading session as mounted. The returned guard clears
    /// "is reading" and force-clears "show controls" when dropped.
    pub fn begin_reading(&self) -> ReadingGuard {
        self.inner.is_reading.store(true, Ordering::SeqCst);
        debug!("reading session flags acquired");
        ReadingGuard {
            flags: self.clone(),
        }
    }
}

/// Scoped ownership of the reader flags for one mounted session
#[derive(Debug)]
pub struct ReadingGuard {
    flags: ReaderFlags,
}

impl Drop for ReadingGuard {
    fn drop(&mut self) {
        self.flags.inner.is_reading.store(false, Ordering::SeqCst);
        // Force-clear regardless of overlay state at unmount time so reader
        // UI state never leaks to subsequent screens
        self.flags.inner.show_controls.store(false, Ordering::SeqCst);
        debug!("reading session flags released");
    }
}
