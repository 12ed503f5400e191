//! Authenticated JSON request/response pipeline.
//!
//! # Design
//! `Transport` is split like the rest of the crate's I/O: `build_request`
//! produces an `HttpRequest`, an `HttpExecutor` performs the round-trip and
//! `parse_response` classifies the result. `send` chains the three.
//!
//! Classification rules:
//! - the body must decode to a JSON object, otherwise the exchange failed
//!   with `Connector("Unexpected response format", 0)` whatever the status;
//! - a `code` above 1 together with a non-2xx status is a gateway error;
//! - everything else, including `code` 0 or 1 on an error status, is a
//!   success and is returned untouched.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Credential;
use crate::error::{Error, Result};
use crate::executor::HttpExecutor;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Payload;

const UNEXPECTED_FORMAT: &str = "Unexpected response format";

/// Sends authenticated requests for one resource client.
#[derive(Clone)]
pub struct Transport {
    credential: Credential,
    executor: Arc<dyn HttpExecutor>,
}

impl Transport {
    pub fn new(credential: Credential, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            credential,
            executor,
        }
    }

    /// Build the request for `url`.
    ///
    /// With no explicit `method`, a request without a body is a GET and one
    /// with a body is a POST.
    pub fn build_request(&self, method: Option<HttpMethod>, url: &str, body: Option<&Payload>) -> Result<HttpRequest> {
        let method = method.unwrap_or_else(|| HttpMethod::infer(body.is_some()));
        let body = body
            .map(|payload| {
                serde_json::to_string(payload).map_err(|e| Error::connector(format!("cannot encode request: {e}"), 0))
            })
            .transpose()?;

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), self.credential.header_value()),
            ],
            body,
        })
    }

    /// Decode and classify a response.
    pub fn parse_response(response: HttpResponse) -> Result<Payload> {
        let payload = match serde_json::from_slice::<Value>(&response.body) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!(status = response.status, "gateway response is not a JSON object");
                return Err(Error::connector(UNEXPECTED_FORMAT, 0));
            }
        };

        if let Some(code) = payload.get("code").and_then(numeric_code) {
            if code > 1 && !response.is_success() {
                let message = match payload.get("message") {
                    Some(Value::String(message)) => message.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                tracing::warn!(status = response.status, code, %message, "gateway rejected request");
                return Err(Error::api(message, code));
            }
        }

        Ok(payload)
    }

    /// Perform one request and return the decoded response object.
    pub fn send(&self, method: Option<HttpMethod>, url: &str, body: Option<&Payload>) -> Result<Payload> {
        let request = self.build_request(method, url, body)?;
        tracing::debug!(method = %request.method, url = %request.url, "sending gateway request");

        let response = self.executor.execute(&request).inspect_err(|err| {
            tracing::warn!(method = %request.method, url = %request.url, error = %err, "gateway request failed");
        })?;
        tracing::debug!(status = response.status, url = %request.url, "gateway responded");

        Self::parse_response(response)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

/// Gateway codes arrive as numbers, occasionally as numeric strings.
fn numeric_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
