//! Client core for the Tarmeez social network.
//!
//! - `domain`: envelope-normalising `HttpClient`, observable `SessionStore`,
//!   path `Router` with history-driven `Navigator`, and the typed
//!   `TarmeezApi`.
//! - `outbound`: reqwest transport and file-backed storage adapters.
//! - `config`: `ClientSettings` loaded through OrthoConfig.
//! - `context`: `TarmeezClient`, the composition root.

pub mod config;
pub mod context;
pub mod domain;
pub mod outbound;

pub use config::ClientSettings;
pub use context::{BootstrapError, TarmeezClient};
