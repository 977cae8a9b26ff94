//! Session history stack mirroring the browser's `pushState` / `popstate`
//! model.

/// Ordered history entries with a movable current position.
///
/// Pushing drops any forward entries, like a browser does after navigating
/// from the middle of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    /// History holding a single entry for `initial_path`.
    #[must_use]
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: vec![initial_path.into()],
            index: 0,
        }
    }

    /// Path of the current entry.
    #[must_use]
    pub fn current(&self) -> &str {
        self.entries
            .get(self.index)
            .map_or("/", String::as_str)
    }

    /// Append `path` after the current entry and make it current.
    pub fn push(&mut self, path: impl Into<String>) {
        self.entries.truncate(self.index.saturating_add(1));
        self.entries.push(path.into());
        self.index = self.entries.len().saturating_sub(1);
    }

    /// Replace the current entry without adding a new one.
    pub fn replace(&mut self, path: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(self.index) {
            *entry = path.into();
        }
    }

    /// Step back one entry. Returns the new current path, or `None` at the
    /// start of the stack.
    pub fn back(&mut self) -> Option<&str> {
        self.index = self.index.checked_sub(1)?;
        Some(self.current())
    }

    /// Step forward one entry. Returns the new current path, or `None` at
    /// the end of the stack.
    pub fn forward(&mut self) -> Option<&str> {
        let next = self.index.saturating_add(1);
        if next >= self.entries.len() {
            return None;
        }
        self.index = next;
        Some(self.current())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: history holds at least the initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}
