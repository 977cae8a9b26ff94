//! Scripted `HttpTransport` double shared by the integration suites.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tarmeez_client::domain::ports::{
    HttpTransport, HttpTransportError, TransportRequest, TransportResponse,
};

/// Replays queued responses in order and records every request it receives.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<TransportResponse, HttpTransportError>>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, status: u16, body: &Value) -> &Self {
        self.push_raw(status, &body.to_string())
    }

    pub(crate) fn push_raw(&self, status: u16, body: &str) -> &Self {
        self.push(Ok(TransportResponse {
            status,
            status_text: reason(status).to_owned(),
            body: body.as_bytes().to_vec(),
        }))
    }

    pub(crate) fn push_failure(&self, error: HttpTransportError) -> &Self {
        self.push(Err(error))
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn push(&self, response: Result<TransportResponse, HttpTransportError>) -> &Self {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(response);
        self
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, HttpTransportError> {
        self.requests.lock().expect("requests lock").push(request);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpTransportError::transport("no scripted response left")))
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Content",
        500 => "Internal Server Error",
        _ => "",
    }
}
