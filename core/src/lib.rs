//! Synchronous client for the Beanstream / Bambora payment gateway.
//!
//! # Overview
//! `Gateway` exposes three resource clients: `Payments`, `Profiles` and
//! `Reporting`. Every method performs exactly one authenticated HTTPS
//! round-trip and returns the decoded JSON response (or a field of it), or
//! an [`Error`].
//!
//! # Design
//! - `Configuration` is an explicit, immutable value; each resource client
//!   derives its URL templates and `Passcode` credential from it once.
//! - Request and response bodies are ordered JSON objects (`Payload`) so
//!   callers can send any field the gateway accepts.
//! - `Transport` splits each call into `build_request` / `parse_response`
//!   around an `HttpExecutor`, which is the only component doing I/O.
//! - No retries, caching or batching: failures surface unchanged.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod http;
pub mod payments;
pub mod profiles;
pub mod reporting;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::{Configuration, Credential, DEFAULT_API_VERSION, DEFAULT_PLATFORM};
pub use endpoints::Endpoints;
pub use error::{Error, Result};
pub use executor::{HttpExecutor, UreqExecutor};
pub use gateway::Gateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payments::Payments;
pub use profiles::Profiles;
pub use reporting::Reporting;
pub use transport::Transport;
pub use types::{Criterion, Operator, Payload, TransactionSearch};
