//! Domain services and primitives of the Tarmeez client.
//!
//! Purpose: normalise every remote call into a success or error envelope,
//! keep the logged-in session observable and persisted, and map URL paths to
//! views. Adapters live behind the traits in [`ports`].
//!
//! Public surface:
//! - `HttpClient` with `ResponseEnvelope` / `ErrorEnvelope`.
//! - `SessionStore`, `Session` and `UserRecord`.
//! - `Router`, `Navigator` and `ViewHost` (see [`router`]).
//! - `TarmeezApi` and the page model (see [`tarmeez`]).
//! - `ThemePreferences`.

mod auth;
mod envelope;
mod http_client;
mod load_gate;
mod multipart;
pub mod ports;
pub mod router;
mod session;
mod session_store;
pub mod tarmeez;
mod theme;

pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::envelope::{
    DEFAULT_ERROR_MESSAGE, ErrorEnvelope, ErrorKind, INVALID_JSON_MESSAGE, LOCAL_FAILURE_STATUS,
    ResponseEnvelope, SUCCESS_MESSAGE, UNEXPECTED_PAYLOAD_MESSAGE,
};
pub use self::http_client::{Headers, HttpClient, RequestBody};
pub use self::load_gate::{LoadGate, LoadPermit};
pub use self::multipart::{FormPart, FormValue, MultipartForm};
pub use self::router::{
    MountTicket, Navigator, RouteOutcome, RouteTemplate, Router, UnmatchedPolicy, ViewHost,
};
pub use self::session::{Session, SessionValidationError, UserId, UserRecord};
pub use self::session_store::{CURRENT_USER_KEY, SessionState, SessionStore, SubscriptionId};
pub use self::theme::{DARK_KEY, SELECTED_THEME_KEY, Theme, ThemePreferences};
