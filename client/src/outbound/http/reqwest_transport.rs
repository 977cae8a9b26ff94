//! Reqwest-backed HTTP transport adapter.
//!
//! This adapter owns wire details only: method and header mapping, JSON and
//! multipart encoding, the request timeout, and error classification. Status
//! handling and JSON decoding stay in the domain `HttpClient`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Request};
use tracing::debug;

use crate::domain::ports::{
    HttpMethod, HttpTransport, HttpTransportError, TransportBody, TransportRequest,
    TransportResponse,
};
use crate::domain::{FormValue, MultipartForm};

const USER_AGENT: &str = concat!("tarmeez-client/", env!("CARGO_PKG_VERSION"));

/// Transport adapter that performs requests with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn build_request(&self, request: TransportRequest) -> Result<Request, HttpTransportError> {
        let mut builder = self
            .client
            .request(map_method(request.method), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            TransportBody::Empty => builder,
            TransportBody::Json(bytes) => builder.body(bytes),
            TransportBody::Multipart(form) => builder.multipart(build_form(&form)?),
        };
        builder.build().map_err(map_transport_error)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, HttpTransportError> {
        let prepared = self.build_request(request)?;
        let response = self
            .client
            .execute(prepared)
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");
        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            body: body.to_vec(),
        })
    }
}

const fn map_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_form(form: &MultipartForm) -> Result<Form, HttpTransportError> {
    let mut encoded = Form::new();
    for part in form.parts() {
        encoded = match &part.value {
            FormValue::Text(text) => encoded.text(part.name.clone(), text.clone()),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let mut file = Part::bytes(bytes.clone()).file_name(file_name.clone());
                if let Some(mime) = content_type {
                    file = file.mime_str(mime).map_err(|error| {
                        HttpTransportError::invalid_request(format!(
                            "invalid content type for part {}: {error}",
                            part.name
                        ))
                    })?;
                }
                encoded.part(part.name.clone(), file)
            }
        };
    }
    Ok(encoded)
}

fn map_transport_error(error: reqwest::Error) -> HttpTransportError {
    if error.is_timeout() {
        HttpTransportError::timeout(error.to_string())
    } else if error.is_builder() {
        HttpTransportError::invalid_request(error.to_string())
    } else {
        HttpTransportError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network request mapping.

    use std::collections::BTreeMap;

    use rstest::rstest;
    use url::Url;

    use super::*;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_secs(5)).expect("client should build")
    }

    fn request(method: HttpMethod, body: TransportBody) -> TransportRequest {
        TransportRequest {
            method,
            url: Url::parse("https://tarmeezacademy.com/api/v1/posts?page=2").expect("valid url"),
            headers: BTreeMap::from([
                ("Accept".to_owned(), "application/json".to_owned()),
                ("Authorization".to_owned(), "Bearer tok".to_owned()),
            ]),
            body,
        }
    }

    #[rstest]
    #[case(HttpMethod::Get, Method::GET)]
    #[case(HttpMethod::Post, Method::POST)]
    #[case(HttpMethod::Put, Method::PUT)]
    #[case(HttpMethod::Patch, Method::PATCH)]
    #[case(HttpMethod::Delete, Method::DELETE)]
    fn maps_methods_url_and_headers(#[case] method: HttpMethod, #[case] expected: Method) {
        let built = transport()
            .build_request(request(method, TransportBody::Empty))
            .expect("request should build");

        assert_eq!(built.method(), &expected);
        assert_eq!(
            built.url().as_str(),
            "https://tarmeezacademy.com/api/v1/posts?page=2"
        );
        assert_eq!(
            built
                .headers()
                .get("authorization")
                .and_then(|value| value.to_str().ok()),
            Some("Bearer tok")
        );
        assert!(built.body().is_none());
    }

    #[test]
    fn json_bodies_are_sent_verbatim() {
        let built = transport()
            .build_request(request(
                HttpMethod::Post,
                TransportBody::Json(br#"{"body":"hi"}"#.to_vec()),
            ))
            .expect("request should build");

        let body = built
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("buffered body");
        assert_eq!(body, br#"{"body":"hi"}"#);
    }

    #[test]
    fn multipart_bodies_carry_boundary_content_type() {
        let form = MultipartForm::new()
            .text("body", "hello")
            .file("image", "cat.png", Some("image/png".to_owned()), vec![1, 2, 3])
            .method_override("put");
        let built = transport()
            .build_request(request(HttpMethod::Post, TransportBody::Multipart(form)))
            .expect("request should build");

        let content_type = built
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .expect("content type");
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn invalid_part_content_type_is_an_invalid_request() {
        let form = MultipartForm::new().file(
            "image",
            "cat.png",
            Some("not a mime".to_owned()),
            vec![0],
        );
        let error = build_form(&form).expect_err("mime must fail");
        assert!(
            matches!(error, HttpTransportError::InvalidRequest { .. }),
            "bad mime types should map to InvalidRequest",
        );
    }

    #[test]
    fn invalid_header_values_are_invalid_requests() {
        let mut bad = request(HttpMethod::Get, TransportBody::Empty);
        bad.headers
            .insert("X-Broken".to_owned(), "line\nbreak".to_owned());
        let error = transport()
            .build_request(bad)
            .expect_err("header must fail");
        assert!(
            matches!(error, HttpTransportError::InvalidRequest { .. }),
            "builder failures should map to InvalidRequest",
        );
    }
}
