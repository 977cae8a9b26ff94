//! Session model: the authenticated user record and bearer token.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Validation errors raised when a session payload is incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    /// The payload was not a JSON object.
    NotAnObject,
    /// `user` was missing or not an object with a numeric `id`.
    MissingUser,
    /// `token` was missing, not a string, or blank.
    MissingToken,
}

impl fmt::Display for SessionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "session must be an object"),
            Self::MissingUser => write!(f, "session user must be an object with a numeric id"),
            Self::MissingToken => write!(f, "session token must be a non-empty string"),
        }
    }
}

impl std::error::Error for SessionValidationError {}

/// Numeric user identifier assigned by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.parse().map(Self)
    }
}

/// User identity with an opaque profile payload.
///
/// Only `id` is interpreted; every other field the API returns (`username`,
/// `name`, `email`, `profile_image`, counters, ...) is preserved verbatim so
/// it survives persistence round trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier.
    pub id: UserId,
    /// Remaining profile fields.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl UserRecord {
    /// Record with no profile fields.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            profile: Map::new(),
        }
    }

    /// Add a profile field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    /// String profile field, if present.
    #[must_use]
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.profile.get(key).and_then(Value::as_str)
    }

    /// `username` profile field, if present.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.field_str("username")
    }
}

/// Authenticated identity plus bearer credential.
///
/// Both halves are always present together; the absence of a session is
/// modelled as `Option<Session>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Logged-in user.
    pub user: UserRecord,
    /// Bearer token sent with authenticated requests.
    pub token: String,
}

impl Session {
    /// Validate and build a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::MissingToken`] when `token` is blank.
    pub fn new(user: UserRecord, token: impl Into<String>) -> Result<Self, SessionValidationError> {
        let session = Self {
            user,
            token: token.into(),
        };
        session.validate()?;
        Ok(session)
    }

    /// Check the invariants a typed value can still break.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError::MissingToken`] when the token is
    /// blank.
    pub fn validate(&self) -> Result<(), SessionValidationError> {
        if self.token.trim().is_empty() {
            return Err(SessionValidationError::MissingToken);
        }
        Ok(())
    }

    /// Decode a `{ user, token }` payload, rejecting partial objects.
    ///
    /// # Errors
    ///
    /// Returns [`SessionValidationError`] naming the first missing half.
    pub fn from_json(value: &Value) -> Result<Self, SessionValidationError> {
        let object = value.as_object().ok_or(SessionValidationError::NotAnObject)?;
        let user = object
            .get("user")
            .and_then(|user| UserRecord::deserialize(user).ok())
            .ok_or(SessionValidationError::MissingUser)?;
        let token = object
            .get("token")
            .and_then(Value::as_str)
            .ok_or(SessionValidationError::MissingToken)?;
        Self::new(user, token)
    }

    /// `Authorization` header value for this session.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
