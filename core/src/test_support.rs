//! Canned-response executor for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::Result;
use crate::executor::HttpExecutor;
use crate::http::{HttpRequest, HttpResponse};

/// Replays queued results in order and records every request it sees.
/// Once the queue is drained it answers `200 {}`.
#[derive(Default)]
pub(crate) struct StubExecutor {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubExecutor {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string().into_bytes(),
        }));
    }

    pub(crate) fn push_error(&self, err: crate::Error) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Body of the most recent request, decoded.
    pub(crate) fn last_body(&self) -> Value {
        let requests = self.requests.lock().unwrap();
        let body = requests.last().and_then(|req| req.body.as_deref()).expect("no request body recorded");
        serde_json::from_str(body).unwrap()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

impl HttpExecutor for StubExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"{}".to_vec(),
            })
        })
    }
}
