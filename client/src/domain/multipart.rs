//! Structured multipart payloads for file uploads.
//!
//! Forms are passed through `HttpClient` untouched; the transport encodes
//! them and picks the boundary and content type.

/// Value carried by one form part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File upload.
    File {
        /// File name reported to the server.
        file_name: String,
        /// MIME type, when known.
        content_type: Option<String>,
        /// Raw file contents.
        bytes: Vec<u8>,
    },
}

/// One named part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FormValue,
}

/// Ordered multipart form.
///
/// # Examples
///
/// ```
/// use tarmeez_client::domain::MultipartForm;
///
/// let form = MultipartForm::new()
///     .text("title", "hello")
///     .method_override("put");
/// assert_eq!(form.text_value("_method"), Some("put"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Field used by the remote API to tunnel `PUT` through `POST`.
    pub const METHOD_OVERRIDE_FIELD: &'static str = "_method";

    /// Create an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Append a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                content_type,
                bytes,
            },
        });
        self
    }

    /// Append the `_method` override field.
    #[must_use]
    pub fn method_override(self, method: &str) -> Self {
        self.text(Self::METHOD_OVERRIDE_FIELD, method)
    }

    /// Parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Value of the first text part called `name`.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            FormValue::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Whether the form has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
