//! Error types for the gateway client.
//!
//! # Design
//! Every failure carries a human-readable message and a numeric code, and
//! falls into one of two kinds:
//!
//! - `Api`: the gateway answered and reported a business error (declined
//!   card, unknown profile, ...), or an otherwise successful response lacked
//!   a field the operation promises to return.
//! - `Connector`: the request never produced a usable answer. Local failures
//!   use code `0`; network failures use the negated transport error number.
//!
//! Nothing in the crate catches or retries these; they surface unchanged
//! from every resource client method.

use thiserror::Error;

/// A specialized `Result` type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The gateway reported an error (`code > 1` with a non-2xx status).
    #[error("API error {code}: {message}")]
    Api { message: String, code: i64 },

    /// The HTTP exchange failed or the response could not be understood.
    #[error("connector error {code}: {message}")]
    Connector { message: String, code: i64 },
}

impl Error {
    pub(crate) fn api(message: impl Into<String>, code: i64) -> Self {
        Error::Api {
            message: message.into(),
            code,
        }
    }

    pub(crate) fn connector(message: impl Into<String>, code: i64) -> Self {
        Error::Connector {
            message: message.into(),
            code,
        }
    }

    /// Gateway error code, or the (negated) transport error number.
    pub fn code(&self) -> i64 {
        match self {
            Error::Api { code, .. } | Error::Connector { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::Api { message, .. } | Error::Connector { message, .. } => message,
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api { .. })
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, Error::Connector { .. })
    }
}
