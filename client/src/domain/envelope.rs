//! Normalised success and failure envelopes returned by `HttpClient`.
//!
//! Every outcome of a request ends up in exactly one of these two shapes, so
//! callers branch on `msg` and `status` without caring whether the remote
//! API, the network, or JSON decoding failed.

use std::fmt;

use pagination::PaginationMeta;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::ports::HttpTransportError;

/// Message carried by every success envelope.
pub const SUCCESS_MESSAGE: &str = "Success";
/// Message used when a response body is not valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON response";
/// Message used when a decoded payload does not match the expected model.
pub const UNEXPECTED_PAYLOAD_MESSAGE: &str = "Unexpected response payload";
/// Last-resort message when neither the body nor the status text helps.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";
/// Status reported for failures that never produced a usable response.
pub const LOCAL_FAILURE_STATUS: u16 = 500;

/// Successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Body `data` field when present and non-null, otherwise the whole body.
    pub data: Value,
    /// Always [`SUCCESS_MESSAGE`].
    pub msg: String,
    /// Transport status code.
    pub status: u16,
    /// Decoded `meta` object for list responses.
    pub pagination: Option<PaginationMeta>,
}

impl ResponseEnvelope {
    pub(crate) fn success(status: u16, body: DecodedBody) -> Self {
        Self {
            data: body.data,
            msg: SUCCESS_MESSAGE.to_owned(),
            status,
            pagination: body.pagination,
        }
    }

    /// Decode `data` into a typed model.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Decode`] envelope when the payload does not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ErrorEnvelope> {
        serde_json::from_value(self.data.clone()).map_err(|err| {
            debug!(status = self.status, error = %err, "response payload did not match model");
            ErrorEnvelope::unexpected_payload()
        })
    }
}

/// Which part of the pipeline produced an [`ErrorEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was obtained.
    Transport,
    /// The response body could not be decoded.
    Decode,
    /// The remote API answered with a non-2xx status.
    Remote,
    /// The client refused to send the request.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transport => "transport",
            Self::Decode => "decode",
            Self::Remote => "remote",
            Self::Validation => "validation",
        })
    }
}

/// Failed request, in the single shape every caller handles.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{msg} (status {status})")]
pub struct ErrorEnvelope {
    /// Raw failure payload from the remote API; `None` for local failures.
    pub data: Option<Value>,
    /// Human-readable message.
    pub msg: String,
    /// HTTP status, or [`LOCAL_FAILURE_STATUS`] for local failures.
    pub status: u16,
    /// Taxonomy entry for the failure.
    pub kind: ErrorKind,
}

impl ErrorEnvelope {
    /// Failure to obtain any response.
    #[must_use]
    pub fn transport(error: &HttpTransportError) -> Self {
        Self::local(ErrorKind::Transport, error.to_string())
    }

    /// Body that is not valid JSON, whatever the status code.
    #[must_use]
    pub fn invalid_json() -> Self {
        Self::local(ErrorKind::Decode, INVALID_JSON_MESSAGE)
    }

    /// Valid JSON whose shape does not match the expected model.
    #[must_use]
    pub fn unexpected_payload() -> Self {
        Self::local(ErrorKind::Decode, UNEXPECTED_PAYLOAD_MESSAGE)
    }

    /// Request refused before any I/O.
    #[must_use]
    pub fn validation(status: u16, msg: impl Into<String>) -> Self {
        Self {
            data: None,
            msg: msg.into(),
            status,
            kind: ErrorKind::Validation,
        }
    }

    /// Non-2xx response with a decoded body.
    ///
    /// The message falls back from the body's `message` field to the status
    /// text and finally to [`DEFAULT_ERROR_MESSAGE`].
    #[must_use]
    pub fn remote(status: u16, status_text: &str, body: Value) -> Self {
        let msg = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .or_else(|| Some(status_text).filter(|text| !text.trim().is_empty()))
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_owned();
        Self {
            data: Some(body),
            msg,
            status,
            kind: ErrorKind::Remote,
        }
    }

    fn local(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            data: None,
            msg: msg.into(),
            status: LOCAL_FAILURE_STATUS,
            kind,
        }
    }

    /// Field-level validation messages from a 422 body, keyed by field.
    #[must_use]
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let Some(errors) = self
            .data
            .as_ref()
            .and_then(|data| data.get("errors"))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };
        errors
            .iter()
            .flat_map(|(field, raw)| {
                let messages: Vec<String> = match raw {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect(),
                    Value::String(message) => vec![message.clone()],
                    _ => Vec::new(),
                };
                messages
                    .into_iter()
                    .map(move |message| (field.clone(), message))
            })
            .collect()
    }
}

/// Response body decoded once at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedBody {
    pub(crate) data: Value,
    pub(crate) pagination: Option<PaginationMeta>,
}

impl DecodedBody {
    pub(crate) fn from_json(body: Value) -> Self {
        let pagination = body.get("meta").and_then(|meta| {
            PaginationMeta::from_json(meta)
                .inspect_err(|err| debug!(error = %err, "ignoring malformed pagination meta"))
                .ok()
        });
        let data = match body {
            Value::Object(mut map) if map.get("data").is_some_and(|data| !data.is_null()) => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        Self { data, pagination }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn unwraps_data_field_and_meta() {
        let body = DecodedBody::from_json(json!({
            "data": [{ "id": 1 }],
            "meta": { "last_page": 4 }
        }));
        assert_eq!(body.data, json!([{ "id": 1 }]));
        assert_eq!(body.pagination, Some(PaginationMeta::with_last_page(4)));
    }

    #[rstest]
    #[case::no_data_field(json!({ "user": { "id": 1 }, "token": "t" }))]
    #[case::null_data_field(json!({ "data": null, "message": "ok" }))]
    #[case::array_body(json!([1, 2]))]
    fn keeps_whole_body_without_usable_data(#[case] body: Value) {
        let decoded = DecodedBody::from_json(body.clone());
        assert_eq!(decoded.data, body);
        assert_eq!(decoded.pagination, None);
    }

    #[test]
    fn ignores_meta_without_last_page() {
        let decoded = DecodedBody::from_json(json!({ "data": [], "meta": { "total": 0 } }));
        assert_eq!(decoded.pagination, None);
    }

    #[rstest]
    #[case::remote_message(json!({ "message": "The given data was invalid." }), "Unprocessable Content", "The given data was invalid.")]
    #[case::status_text(json!({ "error": true }), "Unauthorized", "Unauthorized")]
    #[case::blank_message(json!({ "message": "  " }), "Not Found", "Not Found")]
    #[case::generic_default(json!({}), "", DEFAULT_ERROR_MESSAGE)]
    fn remote_message_falls_back_in_order(
        #[case] body: Value,
        #[case] status_text: &str,
        #[case] expected: &str,
    ) {
        let err = ErrorEnvelope::remote(422, status_text, body.clone());
        assert_eq!(err.msg, expected);
        assert_eq!(err.status, 422);
        assert_eq!(err.data, Some(body));
        assert_eq!(err.kind, ErrorKind::Remote);
    }

    #[test]
    fn local_failures_use_status_500_without_data() {
        let err = ErrorEnvelope::transport(&HttpTransportError::transport("connection refused"));
        assert_eq!(err.status, LOCAL_FAILURE_STATUS);
        assert_eq!(err.data, None);
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.msg, "http transport failed: connection refused");

        let err = ErrorEnvelope::invalid_json();
        assert_eq!(err.msg, INVALID_JSON_MESSAGE);
        assert_eq!(err.status, 500);
    }

    #[test]
    fn collects_field_errors() {
        let err = ErrorEnvelope::remote(
            422,
            "Unprocessable Content",
            json!({
                "message": "The username has already been taken.",
                "errors": {
                    "username": ["The username has already been taken."],
                    "email": "The email must be a valid email address."
                }
            }),
        );
        let mut fields = err.field_errors();
        fields.sort();
        assert_eq!(
            fields,
            vec![
                (
                    "email".to_owned(),
                    "The email must be a valid email address.".to_owned()
                ),
                (
                    "username".to_owned(),
                    "The username has already been taken.".to_owned()
                ),
            ]
        );
    }

    #[test]
    fn decode_maps_shape_mismatch_to_decode_error() {
        #[derive(Debug, Deserialize)]
        struct Named {
            #[expect(dead_code, reason = "only the decode outcome matters")]
            name: String,
        }

        let envelope = ResponseEnvelope::success(
            200,
            DecodedBody::from_json(json!({ "data": { "id": 3 } })),
        );
        let err = envelope.decode::<Named>().expect_err("shape mismatch");
        assert_eq!(err.kind, ErrorKind::Decode);
        assert_eq!(err.msg, UNEXPECTED_PAYLOAD_MESSAGE);
    }
}
