//! Programmatic navigation and history re-resolution.

use tracing::{debug, warn};

use super::history::History;
use super::mount::{MountTicket, ViewHost};
use super::Router;
use crate::domain::ports::Layout;

/// Couples a [`Router`], a [`History`] and a [`ViewHost`].
///
/// `navigate_to` pushes a history entry and mounts the resolved view
/// without any reload; `pop_state` re-resolves whatever entry history now
/// points at, which is how back/forward navigation is handled.
pub struct Navigator<V, L> {
    router: Router<V>,
    history: History,
    host: ViewHost<L>,
}

impl<V, L: Layout<V>> Navigator<V, L> {
    /// Navigator starting at `initial_path`. Nothing is mounted until
    /// [`Navigator::start`].
    #[must_use]
    pub fn new(router: Router<V>, layout: L, initial_path: impl Into<String>) -> Self {
        Self {
            router,
            history: History::new(initial_path),
            host: ViewHost::new(layout),
        }
    }

    /// Mount the view for the initial path.
    pub fn start(&mut self) -> Option<MountTicket> {
        self.render_current()
    }

    /// Push `path` onto history and mount its view.
    pub fn navigate_to(&mut self, path: &str) -> Option<MountTicket> {
        debug!(path, "navigating");
        self.history.push(path);
        self.render_current()
    }

    /// Re-resolve the current history entry, as on a `popstate` event.
    pub fn pop_state(&mut self) -> Option<MountTicket> {
        self.render_current()
    }

    /// Go back one entry and re-resolve. `None` when already at the start.
    pub fn back(&mut self) -> Option<MountTicket> {
        self.history.back()?;
        self.pop_state()
    }

    /// Go forward one entry and re-resolve. `None` when already at the end.
    pub fn forward(&mut self) -> Option<MountTicket> {
        self.history.forward()?;
        self.pop_state()
    }

    /// Path of the current history entry.
    #[must_use]
    pub fn current_path(&self) -> &str {
        self.history.current()
    }

    /// Route table.
    #[must_use]
    pub const fn router(&self) -> &Router<V> {
        &self.router
    }

    /// History stack.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Host of the mounted view.
    #[must_use]
    pub const fn host(&self) -> &ViewHost<L> {
        &self.host
    }

    fn render_current(&mut self) -> Option<MountTicket> {
        let path = self.history.current().to_owned();
        let Some(view) = self.router.build(&path) else {
            warn!(path = %path, "no view to mount for path");
            return None;
        };
        Some(self.host.mount(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RecordingLayout;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum View {
        Home,
        Profile(String),
    }

    fn navigator(initial: &str) -> Navigator<View, RecordingLayout<View>> {
        let router = Router::new()
            .route("/", |_| View::Home)
            .and_then(|router| {
                router.route("/users/:id", |params| {
                    View::Profile(params.get("id").unwrap_or_default().to_owned())
                })
            })
            .expect("valid routes");
        Navigator::new(router, RecordingLayout::new(), initial)
    }

    #[test]
    fn start_mounts_initial_path() {
        let mut nav = navigator("/users/3");
        nav.start().expect("mounted");
        assert_eq!(
            nav.host().layout().current(),
            Some(&View::Profile("3".to_owned()))
        );
    }

    #[test]
    fn back_at_start_of_history_mounts_nothing() {
        let mut nav = navigator("/");
        nav.start();
        assert!(nav.back().is_none());
        assert_eq!(nav.host().layout().history().len(), 1);
    }

    #[test]
    fn forward_remounts_the_later_entry() {
        let mut nav = navigator("/");
        nav.start();
        nav.navigate_to("/users/7");
        nav.back().expect("went back");
        nav.forward().expect("went forward");

        assert_eq!(nav.current_path(), "/users/7");
        assert_eq!(
            nav.host().layout().current(),
            Some(&View::Profile("7".to_owned()))
        );
    }
}
