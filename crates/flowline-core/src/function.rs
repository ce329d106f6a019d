//! Request/response types for hosted functions.
//!
//! A `FunctionRequest` is deliberately opaque to handlers that do not need
//! it: the greeter never reads any field, and the host passes it through
//! untouched from the HTTP layer.

use bytes::Bytes;

/// Inbound invocation as seen by a hosted function.
#[derive(Debug, Clone, Default)]
pub struct FunctionRequest {
    /// HTTP method of the inbound call ("GET", "POST", ...).
    pub method: String,
    /// Request path below the function mount.
    pub path: String,
    /// Raw request body. May be empty or malformed; functions that ignore it
    /// must behave identically either way.
    pub body: Bytes,
}

impl FunctionRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: Bytes) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body,
        }
    }

    /// An empty request, useful for direct invocations and tests.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Outcome of a function invocation.
#[derive(Debug, Clone)]
pub struct FunctionResponse {
    /// Response body bytes, written verbatim to the HTTP response.
    pub body: Bytes,
    /// Content type reported to the caller.
    pub content_type: &'static str,
}

impl FunctionResponse {
    /// Plain-text response.
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            content_type: "text/plain; charset=utf-8",
        }
    }
}
