//! HTTP mapping for the shared error type.
//!
//! Every node surface answers errors with the same JSON body
//! (`{"code": ..., "msg": ...}`) and a status derived from the stable client
//! code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use flowline_core::error::{ClientCode, FlowlineError};
use flowline_core::protocol::ErrorBody;

/// Result alias for axum handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Newtype so `FlowlineError` can flow out of handlers via `?`.
pub struct ApiError(pub FlowlineError);

impl From<FlowlineError> for ApiError {
    fn from(err: FlowlineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody::from_error(&self.0))).into_response()
    }
}
