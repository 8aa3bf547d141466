//! Shared fixtures for the REST integration tests
//!
//! Responses are scripted in order and every request is recorded so tests
//! can inspect what went on the wire.

#![allow(dead_code)]

use async_trait::async_trait;
use cdc_rest::{
    ClientConfig, Credentials, HttpRequest, HttpResponse, HttpTransport, TransportError,
};
use cdc_types::RateBudget;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Successful v2 envelope around `result`
pub fn v2_ok(result: &str) -> String {
    format!(r#"{{"id":0,"method":"","code":0,"result":{}}}"#, result)
}

/// Successful v1 envelope around `data`
pub fn v1_ok(data: &str) -> String {
    format!(r#"{{"code":"0","msg":"suc","data":{}}}"#, data)
}

/// Transport replaying scripted responses
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    sent_at: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn ok(&self, body: impl Into<String>) -> &Self {
        self.respond(200, body)
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request(&self, index: usize) -> HttpRequest {
        self.requests.lock()[index].clone()
    }

    /// JSON body of a recorded request
    pub fn json_body(&self, index: usize) -> serde_json::Value {
        let request = self.request(index);
        serde_json::from_str(request.body.as_deref().unwrap_or("null")).unwrap()
    }

    /// Form fields of a recorded request
    pub fn form_body(&self, index: usize) -> Vec<(String, String)> {
        let request = self.request(index);
        serde_urlencoded::from_str(request.body.as_deref().unwrap_or("")).unwrap()
    }

    /// Time between consecutive sends
    pub fn send_gaps(&self) -> Vec<Duration> {
        self.sent_at
            .lock()
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect()
    }

    pub fn unused(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.sent_at.lock().push(Instant::now());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::RequestFailed("script exhausted".into())))
    }
}

/// Config with test credentials and no pacing
pub fn config() -> ClientConfig {
    ClientConfig::new()
        .with_credentials(Credentials::new("key", "secret").unwrap())
        .with_rate_budget(RateBudget::permissive())
}

/// Value of a form field
pub fn field<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
