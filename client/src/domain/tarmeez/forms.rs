//! Write payloads for posts and profiles.

use std::fmt;

use crate::domain::multipart::MultipartForm;

/// Validation errors for post and profile payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidationError {
    /// Post body was blank.
    EmptyBody,
    /// Comment text was blank.
    EmptyComment,
    /// A profile update changed nothing.
    EmptyProfileUpdate,
}

impl fmt::Display for FormValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "post body must not be empty"),
            Self::EmptyComment => write!(f, "comment must not be empty"),
            Self::EmptyProfileUpdate => write!(f, "profile update must change at least one field"),
        }
    }
}

impl std::error::Error for FormValidationError {}

/// Image file attached to a post, registration or profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap raw image bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// File name sent to the server.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn append_to(&self, form: MultipartForm, field: &str) -> MultipartForm {
        form.file(
            field,
            self.file_name.as_str(),
            self.content_type.clone(),
            self.bytes.clone(),
        )
    }
}

/// Content of a new or edited post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: Option<String>,
    body: String,
    image: Option<ImageUpload>,
}

impl PostDraft {
    /// Draft with the mandatory body.
    ///
    /// # Errors
    ///
    /// Returns [`FormValidationError::EmptyBody`] for a blank body.
    pub fn new(body: &str) -> Result<Self, FormValidationError> {
        if body.trim().is_empty() {
            return Err(FormValidationError::EmptyBody);
        }
        Ok(Self {
            title: None,
            body: body.to_owned(),
            image: None,
        })
    }

    /// Set a title; blank titles are dropped.
    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        let trimmed = title.trim();
        self.title = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Attach an image.
    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub(crate) fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new().text("body", self.body.as_str());
        if let Some(title) = &self.title {
            form = form.text("title", title.as_str());
        }
        if let Some(image) = &self.image {
            form = image.append_to(form, "image");
        }
        form
    }
}

/// Changes to the logged-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileUpdate {
    name: Option<String>,
    email: Option<String>,
    image: Option<ImageUpload>,
}

impl ProfileUpdate {
    /// Empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the display name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        self.name = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Change the e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        let trimmed = email.trim();
        self.email = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Replace the profile image.
    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub(crate) fn to_form(&self) -> Result<MultipartForm, FormValidationError> {
        if self.name.is_none() && self.email.is_none() && self.image.is_none() {
            return Err(FormValidationError::EmptyProfileUpdate);
        }
        let mut form = MultipartForm::new();
        if let Some(name) = &self.name {
            form = form.text("name", name.as_str());
        }
        if let Some(email) = &self.email {
            form = form.text("email", email.as_str());
        }
        if let Some(image) = &self.image {
            form = image.append_to(form, "image");
        }
        Ok(form.method_override("put"))
    }
}
