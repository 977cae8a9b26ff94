//! Single-flight guard for paginated loads.

use std::sync::atomic::{AtomicBool, Ordering};

/// Hands out at most one [`LoadPermit`] at a time.
///
/// Consumers that page through a listing hold a permit for the whole
/// request, so a shared cursor is never advanced by two overlapping loads.
#[derive(Debug, Default)]
pub struct LoadGate {
    loading: AtomicBool,
}

impl LoadGate {
    /// Create an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loading: AtomicBool::new(false),
        }
    }

    /// Take the permit, or `None` while another load holds it.
    #[must_use]
    pub fn try_acquire(&self) -> Option<LoadPermit<'_>> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadPermit { gate: self })
    }

    /// Whether a load currently holds the permit.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

/// Proof that the holder is the only in-flight load; released on drop.
#[derive(Debug)]
pub struct LoadPermit<'a> {
    gate: &'a LoadGate,
}

impl Drop for LoadPermit<'_> {
    fn drop(&mut self) {
        self.gate.loading.store(false, Ordering::Release);
    }
}
