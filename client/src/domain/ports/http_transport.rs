//! Driven port for the fetch-capable HTTP primitive.
//!
//! The domain owns the request and response shapes so `HttpClient` can
//! normalise outcomes without knowing which HTTP stack performs the call.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::multipart::MultipartForm;

/// HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case wire name of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransportBody {
    /// No request body.
    #[default]
    Empty,
    /// Serialised JSON bytes; the caller has already set the content type.
    Json(Vec<u8>),
    /// Multipart form; the transport chooses the content type and boundary.
    Multipart(MultipartForm),
}

/// Fully resolved request passed to [`HttpTransport::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Verb to send.
    pub method: HttpMethod,
    /// Absolute request URL including query string.
    pub url: Url,
    /// Header names (lowercased) and values, already merged.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: TransportBody,
}

/// Raw response returned by the transport before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Numeric HTTP status.
    pub status: u16,
    /// Reason phrase for the status, empty when unknown.
    pub status_text: String,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status lies in `[200, 300)`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

define_port_error! {
    /// Errors raised when no HTTP response was obtained.
    pub enum HttpTransportError {
        /// The request never reached the server or the connection broke.
        Transport { message: String } =>
            "http transport failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "http request timed out: {message}",
        /// The request could not be encoded for the wire.
        InvalidRequest { message: String } =>
            "http request invalid: {message}",
    }
}

/// Port for sending one HTTP request and reading the whole response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the status and body.
    ///
    /// Any status code, including 4xx and 5xx, is a successful transport
    /// outcome; only failures to obtain a response are errors.
    async fn send(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, HttpTransportError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(HttpMethod::Get, "GET")]
    #[case(HttpMethod::Post, "POST")]
    #[case(HttpMethod::Put, "PUT")]
    #[case(HttpMethod::Patch, "PATCH")]
    #[case(HttpMethod::Delete, "DELETE")]
    fn methods_render_wire_names(#[case] method: HttpMethod, #[case] expected: &str) {
        assert_eq!(method.to_string(), expected);
    }

    #[rstest]
    #[case(199, false)]
    #[case(200, true)]
    #[case(204, true)]
    #[case(299, true)]
    #[case(300, false)]
    #[case(404, false)]
    fn success_range_is_2xx(#[case] status: u16, #[case] expected: bool) {
        let response = TransportResponse {
            status,
            status_text: String::new(),
            body: Vec::new(),
        };
        assert_eq!(response.is_success(), expected);
    }

    #[test]
    fn transport_error_messages_name_the_failure() {
        let err = HttpTransportError::timeout("after 30s");
        assert_eq!(err.to_string(), "http request timed out: after 30s");
        assert_eq!(err.variant_name(), "Timeout");
    }
}
