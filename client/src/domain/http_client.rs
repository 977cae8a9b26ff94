//! Single choke point for network I/O against the remote REST API.
//!
//! `HttpClient` resolves paths against a fixed base origin, attaches the
//! default headers, hands the request to an [`HttpTransport`], and folds
//! every outcome into [`ResponseEnvelope`] or [`ErrorEnvelope`]. It also owns
//! the pagination cursor shared by list requests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pagination::{PageCursor, PageRequest, PaginationMeta};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::envelope::{DecodedBody, ErrorEnvelope, LOCAL_FAILURE_STATUS, ResponseEnvelope};
use super::multipart::MultipartForm;
use super::ports::{HttpMethod, HttpTransport, TransportBody, TransportRequest};

/// Header map merged into each request; later entries replace defaults.
///
/// Names are compared case-insensitively: the client lowercases every name
/// before merging, so `Accept` given here replaces the default `accept`.
pub type Headers = BTreeMap<String, String>;

const ACCEPT_HEADER: &str = "accept";
const CONTENT_TYPE_HEADER: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Body accepted by [`HttpClient::request`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Value serialised as JSON with an explicit JSON content type.
    Json(Value),
    /// Multipart form passed through untouched.
    Multipart(MultipartForm),
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        if value.is_null() {
            Self::Empty
        } else {
            Self::Json(value)
        }
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

/// HTTP client that normalises responses into envelopes.
///
/// The pagination cursor is shared by every caller of one client. At most
/// one paginated request should be in flight per cursor; callers enforce
/// that with a [`LoadGate`](super::LoadGate).
pub struct HttpClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    cursor: Mutex<PageCursor>,
}

impl HttpClient {
    /// Build a client that appends request paths to `base_url`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        let mut trimmed: String = base_url.into();
        while trimmed.ends_with('/') {
            trimmed.pop();
        }
        Self {
            transport,
            base_url: trimmed,
            cursor: Mutex::new(PageCursor::new()),
        }
    }

    /// Base origin every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current page of the shared cursor.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.cursor().page()
    }

    /// Restart paginated listings from the first page.
    pub fn reset_page(&self) {
        self.cursor().reset();
    }

    /// Send a request and normalise the outcome.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorEnvelope`] with status 500 when no response was
    /// obtained or the body is not JSON, and with the response status for
    /// any non-2xx answer.
    pub async fn request(
        &self,
        path: &str,
        method: HttpMethod,
        body: RequestBody,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope> {
        let url = self.resolve(path)?;
        self.send(method, url, body, extra_headers).await
    }

    /// `GET` with `query_params` serialised into the query string.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get<I, K, V>(
        &self,
        path: &str,
        query_params: I,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.resolve(path)?;
        let mut pairs = query_params.into_iter().peekable();
        if pairs.peek().is_some() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key.as_ref(), value.as_ref());
            }
        }
        self.send(HttpMethod::Get, url, RequestBody::Empty, extra_headers)
            .await
    }

    /// `GET` the page the shared cursor points at.
    ///
    /// Appends `limit` (when given) and `page` to any query already present
    /// in `path`. A successful response carrying `meta.last_page` advances
    /// the cursor.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get_page(
        &self,
        path: &str,
        limit: Option<u32>,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope> {
        let mut url = self.resolve(path)?;
        let request = PageRequest::from_cursor(&self.cursor(), limit);
        request.append_to(&mut url);
        self.send(HttpMethod::Get, url, RequestBody::Empty, extra_headers)
            .await
    }

    /// `POST` convenience.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope> {
        self.request(path, HttpMethod::Post, body.into(), extra_headers)
            .await
    }

    /// `PUT` convenience.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put(
        &self,
        path: &str,
        body: impl Into<RequestBody>,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope> {
        self.request(path, HttpMethod::Put, body.into(), extra_headers)
            .await
    }

    /// `DELETE` convenience.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(
        &self,
        path: &str,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope> {
        self.request(path, HttpMethod::Delete, RequestBody::Empty, extra_headers)
            .await
    }

    fn resolve(&self, path: &str) -> Result<Url, ErrorEnvelope> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|err| {
            warn!(url = %raw, error = %err, "refusing to send request to invalid URL");
            ErrorEnvelope::validation(
                LOCAL_FAILURE_STATUS,
                format!("invalid request URL: {err}"),
            )
        })
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        body: RequestBody,
        extra_headers: &Headers,
    ) -> Result<ResponseEnvelope, ErrorEnvelope> {
        let mut headers = Headers::new();
        headers.insert(ACCEPT_HEADER.to_owned(), JSON_CONTENT_TYPE.to_owned());
        let transport_body = match body {
            RequestBody::Empty => TransportBody::Empty,
            RequestBody::Json(value) => {
                headers.insert(CONTENT_TYPE_HEADER.to_owned(), JSON_CONTENT_TYPE.to_owned());
                TransportBody::Json(serde_json::to_vec(&value).map_err(|err| {
                    warn!(error = %err, "failed to serialise JSON request body");
                    ErrorEnvelope::validation(
                        LOCAL_FAILURE_STATUS,
                        format!("invalid JSON request body: {err}"),
                    )
                })?)
            }
            RequestBody::Multipart(form) => TransportBody::Multipart(form),
        };
        headers.extend(
            extra_headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );

        debug!(%method, url = %url, "sending request");
        let response = self
            .transport
            .send(TransportRequest {
                method,
                url,
                headers,
                body: transport_body,
            })
            .await
            .map_err(|err| {
                warn!(%method, kind = err.variant_name(), error = %err, "request failed before a response");
                ErrorEnvelope::transport(&err)
            })?;

        let decoded: Value = serde_json::from_slice(&response.body).map_err(|err| {
            warn!(status = response.status, error = %err, "response body is not JSON");
            ErrorEnvelope::invalid_json()
        })?;

        if !response.is_success() {
            debug!(status = response.status, "remote API rejected request");
            return Err(ErrorEnvelope::remote(
                response.status,
                &response.status_text,
                decoded,
            ));
        }

        let decoded_body = DecodedBody::from_json(decoded);
        if let Some(meta) = decoded_body.pagination.as_ref() {
            self.advance_cursor(meta);
        }
        Ok(ResponseEnvelope::success(response.status, decoded_body))
    }

    fn advance_cursor(&self, meta: &PaginationMeta) {
        let mut cursor = self.cursor();
        if cursor.advance(meta) {
            debug!(page = cursor.page(), last_page = meta.last_page, "advanced page cursor");
        }
    }

    fn cursor(&self) -> MutexGuard<'_, PageCursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
