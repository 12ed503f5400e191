//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `HttpExecutor` is the only place the crate touches I/O. `UreqExecutor`
//! performs one blocking round-trip per call with certificate verification
//! left on and a fixed global timeout. Non-2xx statuses are returned as data
//! so the transport can apply the gateway's own error rules.
//!
//! Network failures are reported as `Error::Connector` with a negated error
//! number. The numbers follow libcurl's error table so existing merchant
//! integrations see familiar values (`-6` unresolved host, `-7` connection
//! refused, `-28` timeout).

use std::time::Duration;

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Upper bound for a whole request, connect through last body byte.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const ERRNO_GENERIC: i64 = 1;
const ERRNO_HOST_NOT_FOUND: i64 = 6;
const ERRNO_CONNECTION_FAILED: i64 = 7;
const ERRNO_TIMEOUT: i64 = 28;
const ERRNO_RECV: i64 = 56;

/// Performs a single HTTP round-trip.
pub trait HttpExecutor: Send + Sync {
    /// Execute `request` and return the response, whatever its status.
    ///
    /// Fails only when no response was obtained.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking executor backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqExecutor {
    agent: Agent,
    timeout: Duration,
}

impl UreqExecutor {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

impl std::fmt::Debug for UreqExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqExecutor").field("timeout", &self.timeout).finish()
    }
}

impl Default for UreqExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpExecutor for UreqExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(url), request),
            HttpMethod::Delete => send_without_body(self.agent.delete(url), request),
            HttpMethod::Post => send_with_body(self.agent.post(url), request),
            HttpMethod::Put => send_with_body(self.agent.put(url), request),
        };
        let mut response = result.map_err(connector_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(connector_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

// GET and DELETE still carry a JSON body when one was supplied.
fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let builder = with_headers(builder, request);
    match &request.body {
        Some(body) => builder.force_send_body().send(body.as_bytes()),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let builder = with_headers(builder, request);
    match &request.body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn connector_error(err: ureq::Error) -> Error {
    let errno = match &err {
        ureq::Error::HostNotFound => ERRNO_HOST_NOT_FOUND,
        ureq::Error::ConnectionFailed => ERRNO_CONNECTION_FAILED,
        ureq::Error::Timeout(_) => ERRNO_TIMEOUT,
        ureq::Error::Io(io) => io.raw_os_error().map(i64::from).unwrap_or(ERRNO_RECV),
        _ => ERRNO_GENERIC,
    };
    Error::connector(err.to_string(), -errno)
}
