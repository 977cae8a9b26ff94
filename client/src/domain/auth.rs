//! Credential and registration inputs validated before they reach the API.

use std::fmt;

use zeroize::Zeroizing;

use super::multipart::MultipartForm;
use super::tarmeez::ImageUpload;

/// Validation errors for login and registration inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Display name was missing or blank once trimmed.
    EmptyName,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept as typed; it is wiped from memory on
///   drop.
///
/// # Examples
/// ```
/// use tarmeez_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" amal ", "secret").unwrap();
/// assert_eq!(creds.username(), "amal");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw username and password inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] for blank inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "password": self.password.as_str(),
        })
    }
}

/// Account registration form, sent as multipart because of the avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    name: String,
    email: Option<String>,
    image: Option<ImageUpload>,
}

impl Registration {
    /// Validate the mandatory registration fields.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError::EmptyName`] for a blank name.
    pub fn new(
        credentials: LoginCredentials,
        name: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        Ok(Self {
            credentials,
            name: trimmed.to_owned(),
            email: None,
            image: None,
        })
    }

    /// Attach an e-mail address; blank input is ignored.
    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        let trimmed = email.trim();
        self.email = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Attach a profile image.
    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Username the account will be created with.
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub(crate) fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("username", self.credentials.username())
            .text("password", self.credentials.password())
            .text("name", self.name.as_str());
        if let Some(email) = &self.email {
            form = form.text("email", email.as_str());
        }
        if let Some(image) = &self.image {
            form = image.append_to(form, "image");
        }
        form
    }
}
