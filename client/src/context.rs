//! Composition root wiring adapters into the shared client services.
//!
//! One [`TarmeezClient`] replaces the process-wide singletons a UI would
//! otherwise reach for: every view borrows the same `HttpClient`,
//! `SessionStore`, `ThemePreferences` and `TarmeezApi` from it.

use std::path::PathBuf;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tracing::info;

use crate::config::ClientSettings;
use crate::domain::ports::{HttpTransport, KeyValueStore, Layout};
use crate::domain::router::RouteTemplateError;
use crate::domain::tarmeez::{Page, TarmeezApi, tarmeez_routes};
use crate::domain::{HttpClient, Navigator, SessionStore, ThemePreferences};
use crate::outbound::http::ReqwestTransport;
use crate::outbound::storage::FileKeyValueStore;

/// Errors raised while building a client from settings.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The reqwest client could not be constructed.
    #[error("failed to build http transport: {0}")]
    Transport(#[from] reqwest::Error),
    /// The state directory path is not valid UTF-8.
    #[error("state directory is not valid UTF-8: {}", .path.display())]
    NonUtf8StateDir {
        /// Offending path.
        path: PathBuf,
    },
    /// The state directory could not be created or opened.
    #[error("failed to open state directory {path}: {source}")]
    StateDir {
        /// State directory path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Shared services for one client process.
pub struct TarmeezClient {
    http: Arc<HttpClient>,
    session: Arc<SessionStore>,
    theme: Arc<ThemePreferences>,
    api: Arc<TarmeezApi>,
}

impl TarmeezClient {
    /// Build the reqwest transport and file store described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when the transport or state directory
    /// cannot be set up.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, BootstrapError> {
        let transport = ReqwestTransport::new(settings.request_timeout())?;
        let state_dir = Utf8PathBuf::from_path_buf(settings.state_dir())
            .map_err(|path| BootstrapError::NonUtf8StateDir { path })?;
        let storage = FileKeyValueStore::open(&state_dir).map_err(|source| {
            BootstrapError::StateDir {
                path: state_dir.clone(),
                source,
            }
        })?;
        info!(
            base_url = settings.base_url(),
            state_dir = %state_dir,
            "tarmeez client configured"
        );
        Ok(Self::with_ports(
            settings,
            Arc::new(transport),
            Arc::new(storage),
        ))
    }

    /// Build the services over caller-supplied adapters.
    #[must_use]
    pub fn with_ports(
        settings: &ClientSettings,
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let http = Arc::new(HttpClient::new(transport, settings.base_url()));
        let session = Arc::new(SessionStore::load(Arc::clone(&storage)));
        let theme = Arc::new(ThemePreferences::load(storage));
        let api = Arc::new(
            TarmeezApi::new(Arc::clone(&http), Arc::clone(&session))
                .with_page_limit(settings.page_limit()),
        );
        Self {
            http,
            session,
            theme,
            api,
        }
    }

    /// Shared HTTP client.
    #[must_use]
    pub fn http(&self) -> Arc<HttpClient> {
        Arc::clone(&self.http)
    }

    /// Shared session store.
    #[must_use]
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    /// Shared theme preferences.
    #[must_use]
    pub fn theme(&self) -> Arc<ThemePreferences> {
        Arc::clone(&self.theme)
    }

    /// Shared endpoint facade.
    #[must_use]
    pub fn api(&self) -> Arc<TarmeezApi> {
        Arc::clone(&self.api)
    }

    /// Navigator over the client's pages, mounting into `layout`.
    ///
    /// # Errors
    ///
    /// Propagates [`RouteTemplateError`] from the page templates.
    pub fn navigator<L: Layout<Page>>(
        &self,
        layout: L,
        initial_path: &str,
    ) -> Result<Navigator<Page, L>, RouteTemplateError> {
        Ok(Navigator::new(tarmeez_routes()?, layout, initial_path))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::ports::{InMemoryKeyValueStore, MockHttpTransport, RecordingLayout};
    use crate::domain::{CURRENT_USER_KEY, DARK_KEY};

    #[test]
    fn services_share_restored_state() {
        let storage = Arc::new(InMemoryKeyValueStore::with_entries([
            (
                CURRENT_USER_KEY,
                r#"{"user":{"id":3,"username":"amal"},"token":"tok"}"#,
            ),
            (DARK_KEY, "true"),
        ]));
        let client = TarmeezClient::with_ports(
            &ClientSettings::default(),
            Arc::new(MockHttpTransport::new()),
            storage,
        );

        assert!(client.session().is_authenticated());
        assert!(client.api().session().is_authenticated());
        assert!(client.theme().is_dark());
        assert_eq!(client.http().base_url(), crate::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn from_settings_creates_state_dir() {
        let temp = TempDir::new().expect("temp dir");
        let state_dir = temp.path().join("nested").join("state");
        let settings = ClientSettings {
            state_dir: Some(state_dir.clone()),
            ..ClientSettings::default()
        };

        let client = TarmeezClient::from_settings(&settings).expect("bootstrap");

        assert!(state_dir.is_dir());
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn navigator_starts_on_requested_page() {
        let client = TarmeezClient::with_ports(
            &ClientSettings::default(),
            Arc::new(MockHttpTransport::new()),
            Arc::new(InMemoryKeyValueStore::new()),
        );
        let mut navigator = client
            .navigator(RecordingLayout::new(), "/users/5")
            .expect("static templates");

        navigator.start();
        assert_eq!(
            navigator.host().layout().current(),
            Some(&Page::Profile { id: "5".to_owned() })
        );
    }
}
