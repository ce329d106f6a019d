//! Function host HTTP surface: `/fn/{name}`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};

use flowline_core::error::FlowlineError;
use flowline_core::function::FunctionRequest;

use crate::app_state::AppState;
use crate::reply::ApiResult;

/// Invoke a hosted function by name. The request is passed through opaquely;
/// whether the function reads it is its own business.
pub async fn invoke(
    State(app): State<AppState>,
    Path(name): Path<String>,
    method: Method,
    body: Bytes,
) -> ApiResult<Response> {
    let Some(func) = app.functions().get(&name) else {
        app.metrics()
            .function_calls
            .inc(&[("function", &name), ("outcome", "unknown")]);
        return Err(FlowlineError::NotFound(format!("unknown function: {name}")).into());
    };

    let req = FunctionRequest::new(method.as_str(), format!("/fn/{name}"), body);
    let resp = func.invoke(req).await.map_err(|e| {
        app.metrics()
            .function_calls
            .inc(&[("function", &name), ("outcome", "error")]);
        e
    })?;

    app.metrics()
        .function_calls
        .inc(&[("function", &name), ("outcome", "ok")]);

    Ok(([(header::CONTENT_TYPE, resp.content_type)], resp.body).into_response())
}
