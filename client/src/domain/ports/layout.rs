//! Driving port for the layout that hosts the current top-level view.

use crate::domain::router::MountTicket;

/// Mount target for views produced by the router.
///
/// Implementations replace their current view with `view` while keeping
/// persistent chrome (navigation bar, theme) in place. The ticket lets the
/// mounted view detect when it has been superseded.
pub trait Layout<V> {
    /// Replace the current view with `view`.
    fn mount(&mut self, view: V, ticket: MountTicket);
}

/// Layout that records every mounted view, for tests and diagnostics.
///
/// The history is never pruned. Long-running hosts should implement
/// [`Layout`] themselves and keep only the current mount.
#[derive(Debug)]
pub struct RecordingLayout<V> {
    mounted: Vec<(V, MountTicket)>,
}

impl<V> RecordingLayout<V> {
    /// Create an empty layout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mounted: Vec::new(),
        }
    }

    /// The view mounted most recently, if any.
    #[must_use]
    pub fn current(&self) -> Option<&V> {
        self.mounted.last().map(|(view, _)| view)
    }

    /// Ticket issued with the most recent mount, if any.
    #[must_use]
    pub fn current_ticket(&self) -> Option<&MountTicket> {
        self.mounted.last().map(|(_, ticket)| ticket)
    }

    /// Every mount in order.
    #[must_use]
    pub fn history(&self) -> &[(V, MountTicket)] {
        &self.mounted
    }
}

impl<V> Default for RecordingLayout<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Layout<V> for RecordingLayout<V> {
    fn mount(&mut self, view: V, ticket: MountTicket) {
        self.mounted.push((view, ticket));
    }
}
