//! Single-flight guard shared by every sync entry point.

use std::sync::atomic::{AtomicBool, Ordering};

/// At most one holder at a time. Acquisition is one compare-and-swap, so
/// concurrent callers cannot both pass the check.
#[derive(Debug, Default)]
pub struct RunGuard {
    running: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the guard, or `None` if a run already holds it.
    pub fn try_acquire(&self) -> Option<RunGuardHandle<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuardHandle { guard: self })
    }

    pub fn is_held(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the guard when dropped, including on early return and unwind.
#[derive(Debug)]
pub struct RunGuardHandle<'a> {
    guard: &'a RunGuard,
}

impl Drop for RunGuardHandle<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}
