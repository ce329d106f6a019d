//! Broker HTTP surface: `/publish/{topic}` and `/subscribe/{topic}`.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::Json;

use flowline_core::error::FlowlineError;
use flowline_core::protocol::{Publish, PublishReceipt, SubscribeReply};

use crate::app_state::AppState;
use crate::reply::ApiResult;

/// Accept `{"message": "..."}` and append it to the topic queue. The body is
/// decoded from a raw value so a missing or empty `message` maps to the
/// broker's own 400 instead of an extractor rejection.
pub async fn publish(
    State(app): State<AppState>,
    Path(topic): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<PublishReceipt>> {
    let publish: Publish = serde_json::from_value(body).map_err(|_| {
        app.metrics().publish_rejections.inc(&[("topic", &topic)]);
        FlowlineError::BadRequest("missing message".into())
    })?;
    publish.validate().map_err(|e| {
        app.metrics().publish_rejections.inc(&[("topic", &topic)]);
        e
    })?;

    tracing::info!(%topic, message = %publish.message, "message published");
    app.topics().push(&topic, publish.message)?;
    app.metrics().published.inc(&[("topic", &topic)]);

    Ok(Json(PublishReceipt::published(topic)))
}

/// Long-poll the topic queue; reply `{"message": null}` when the window
/// elapses empty.
pub async fn subscribe(
    State(app): State<AppState>,
    Path(topic): Path<String>,
) -> Json<SubscribeReply> {
    let window = Duration::from_millis(app.cfg().broker.subscribe_wait_ms);
    let message = app.topics().pop_within(&topic, window).await;

    match &message {
        Some(m) => {
            app.metrics().delivered.inc(&[("topic", &topic)]);
            tracing::debug!(%topic, message = %m, "message delivered");
        }
        None => {
            app.metrics().subscribe_timeouts.inc(&[("topic", &topic)]);
        }
    }

    Json(SubscribeReply { message })
}
