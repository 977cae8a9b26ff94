//! Mounting views with generation tickets.
//!
//! Each mount bumps a generation counter and hands the new view a
//! [`MountTicket`]. A view that loads data asynchronously checks its ticket
//! before applying results, so a slow response for a superseded view cannot
//! overwrite the view that replaced it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::domain::ports::Layout;

/// Proof of which mount a view belongs to.
#[derive(Debug, Clone)]
pub struct MountTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl MountTicket {
    /// Generation this ticket was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer view has been mounted since this ticket was issued.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

impl PartialEq for MountTicket {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation && Arc::ptr_eq(&self.latest, &other.latest)
    }
}

impl Eq for MountTicket {}

/// Owns the layout and guarantees exactly one current view.
#[derive(Debug)]
pub struct ViewHost<L> {
    layout: L,
    latest: Arc<AtomicU64>,
}

impl<L> ViewHost<L> {
    /// Host views inside `layout`.
    #[must_use]
    pub fn new(layout: L) -> Self {
        Self {
            layout,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Mount `view`, superseding every previously issued ticket.
    pub fn mount<V>(&mut self, view: V) -> MountTicket
    where
        L: Layout<V>,
    {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        let ticket = MountTicket {
            generation,
            latest: Arc::clone(&self.latest),
        };
        debug!(generation, "mounting view");
        self.layout.mount(view, ticket.clone());
        ticket
    }

    /// Generation of the current view; zero before the first mount.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Hosted layout.
    #[must_use]
    pub const fn layout(&self) -> &L {
        &self.layout
    }

    /// Hosted layout, mutably.
    pub const fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }
}
