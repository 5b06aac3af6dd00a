//! In-memory transport for tests.

use crate::transport::{Method, Request, Response};
use crate::{Error, Result, Transport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub base_url: Option<String>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Replays queued outcomes in order and records every request.
#[derive(Default)]
pub(crate) struct MockTransport {
    outcomes: Mutex<VecDeque<Result<Response>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16) -> Self {
        self.respond_with(status, Value::Null)
    }

    pub fn respond_with(self, status: u16, body: Value) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(Response { status, body }));
        self
    }

    pub fn fail(self, error: Error) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: Request<'_>) -> Result<Response> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method,
            base_url: request.base_url.map(str::to_string),
            path: request.path.to_string(),
            query: request
                .query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: request.body.cloned(),
        });

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("no response queued".into())))
    }
}
