//! Persisted theme preferences: dark mode flag and selected theme name.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use super::ports::KeyValueStore;

/// Storage key for the dark mode flag (`"true"` / `"false"`).
pub const DARK_KEY: &str = "dark";
/// Storage key for the selected theme name.
pub const SELECTED_THEME_KEY: &str = "selectedTheme";

/// Snapshot of the theme preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Theme {
    /// Dark mode enabled.
    pub dark: bool,
    /// Named colour theme; `None` keeps the default palette.
    pub selected_theme: Option<String>,
}

/// Theme preferences backed by key-value storage.
///
/// Unreadable or malformed stored values fall back to defaults; write
/// failures are logged and the in-memory value is kept.
pub struct ThemePreferences {
    storage: Arc<dyn KeyValueStore>,
    current: Mutex<Theme>,
}

impl ThemePreferences {
    /// Load preferences from `storage`.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let theme = Theme {
            dark: read_dark(storage.as_ref()),
            selected_theme: read_selected(storage.as_ref()),
        };
        Self {
            storage,
            current: Mutex::new(theme),
        }
    }

    /// Current preferences.
    #[must_use]
    pub fn current(&self) -> Theme {
        self.theme().clone()
    }

    /// Whether dark mode is on.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme().dark
    }

    /// Turn dark mode on or off.
    pub fn set_dark(&self, dark: bool) {
        self.theme().dark = dark;
        self.write(DARK_KEY, if dark { "true" } else { "false" });
    }

    /// Flip dark mode and return the new value.
    pub fn toggle_dark(&self) -> bool {
        let dark = !self.is_dark();
        self.set_dark(dark);
        dark
    }

    /// Select a named theme. Blank names clear the selection.
    pub fn set_selected_theme(&self, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            self.theme().selected_theme = None;
            if let Err(err) = self.storage.remove(SELECTED_THEME_KEY) {
                warn!(error = %err, "failed to clear selected theme");
            }
            return;
        }
        self.theme().selected_theme = Some(trimmed.to_owned());
        self.write(SELECTED_THEME_KEY, trimmed);
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            warn!(key, error = %err, "failed to persist theme preference");
        }
    }

    fn theme(&self) -> MutexGuard<'_, Theme> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_dark(storage: &dyn KeyValueStore) -> bool {
    match storage.get(DARK_KEY) {
        Ok(Some(raw)) => match raw.trim() {
            "true" => true,
            "false" => false,
            other => {
                warn!(value = other, "ignoring malformed dark mode flag");
                false
            }
        },
        Ok(None) => false,
        Err(err) => {
            warn!(error = %err, "failed to read dark mode flag");
            false
        }
    }
}

fn read_selected(storage: &dyn KeyValueStore) -> Option<String> {
    match storage.get(SELECTED_THEME_KEY) {
        Ok(raw) => raw
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty()),
        Err(err) => {
            warn!(error = %err, "failed to read selected theme");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{InMemoryKeyValueStore, KeyValueStoreError, MockKeyValueStore};

    #[rstest]
    #[case::missing(None, false)]
    #[case::enabled(Some("true"), true)]
    #[case::disabled(Some("false"), false)]
    #[case::corrupt(Some("yes please"), false)]
    fn dark_flag_degrades_to_default(#[case] stored: Option<&str>, #[case] expected: bool) {
        let storage = match stored {
            Some(value) => InMemoryKeyValueStore::with_entries([(DARK_KEY, value)]),
            None => InMemoryKeyValueStore::new(),
        };
        let prefs = ThemePreferences::load(Arc::new(storage));
        assert_eq!(prefs.is_dark(), expected);
    }

    #[test]
    fn preferences_survive_reload() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let prefs = ThemePreferences::load(storage.clone());
        assert!(prefs.toggle_dark());
        prefs.set_selected_theme("ocean");

        let reloaded = ThemePreferences::load(storage);
        assert_eq!(
            reloaded.current(),
            Theme {
                dark: true,
                selected_theme: Some("ocean".to_owned()),
            }
        );
    }

    #[test]
    fn blank_theme_name_clears_selection() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([(
            SELECTED_THEME_KEY,
            "forest",
        )]));
        let prefs = ThemePreferences::load(storage.clone());
        prefs.set_selected_theme("  ");

        assert_eq!(prefs.current().selected_theme, None);
        assert_eq!(storage.get(SELECTED_THEME_KEY).expect("get"), None);
    }

    #[test]
    fn storage_failures_fall_back_and_keep_memory() {
        let mut storage = MockKeyValueStore::new();
        storage
            .expect_get()
            .returning(|key| Err(KeyValueStoreError::read(key, "disk gone")));
        storage
            .expect_set()
            .returning(|key, _| Err(KeyValueStoreError::write(key, "disk gone")));
        let prefs = ThemePreferences::load(Arc::new(storage));

        assert_eq!(prefs.current(), Theme::default());
        prefs.set_dark(true);
        assert!(prefs.is_dark());
    }
}
