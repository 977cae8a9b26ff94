//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Origin of the public Tarmeez API.
pub const DEFAULT_BASE_URL: &str = "https://tarmeezacademy.com/api/v1";
/// Request timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Directory holding persisted client state.
pub const DEFAULT_STATE_DIR: &str = ".tarmeez";
/// Posts requested per feed page.
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

/// Settings for the HTTP transport, state directory and feed paging.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TARMEEZ")]
pub struct ClientSettings {
    /// Base origin every API path is appended to.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Directory where the session and theme are persisted.
    pub state_dir: Option<PathBuf>,
    /// Posts requested per feed page.
    #[ortho_config(default = 5)]
    pub page_limit: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            state_dir: None,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the public API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Return the configured request timeout, falling back to 30 seconds.
    ///
    /// A zero timeout is treated as unset.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        let secs = match self.request_timeout_secs {
            0 => DEFAULT_REQUEST_TIMEOUT_SECS,
            secs => secs,
        };
        Duration::from_secs(secs)
    }

    /// Return the configured state directory, falling back to `.tarmeez`.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
    }

    /// Return the configured feed page size, falling back to 5.
    #[must_use]
    pub const fn page_limit(&self) -> u32 {
        match self.page_limit {
            0 => DEFAULT_PAGE_LIMIT,
            limit => limit,
        }
    }
}
