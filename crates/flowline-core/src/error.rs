//! Shared error type across flowline crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Unknown topic, function, or route target.
    NotFound,
    /// A downstream hop (broker, controller, function host) failed.
    UpstreamUnavailable,
    /// Unsupported config/protocol version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FlowlineError>;

/// Unified error type used by core and the node runtime.
#[derive(Debug, Error)]
pub enum FlowlineError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream unavailable: {0}")]
    Upstream(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl FlowlineError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            FlowlineError::BadRequest(_) => ClientCode::BadRequest,
            FlowlineError::NotFound(_) => ClientCode::NotFound,
            FlowlineError::Upstream(_) => ClientCode::UpstreamUnavailable,
            FlowlineError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            FlowlineError::Internal(_) => ClientCode::Internal,
        }
    }
}
