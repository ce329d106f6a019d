//! Controller HTTP surface: `/{level}`, `/ack/{topic}`, `/pending/{topic}`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use flowline_core::error::FlowlineError;
use flowline_core::protocol::{Level, Publish};

use crate::app_state::AppState;
use crate::reply::ApiResult;

/// Forward a priority level to the broker as a message on the level's topic.
/// Unknown levels are a 400; a failed broker publish is a 502.
pub async fn level(State(app): State<AppState>, Path(level): Path<String>) -> ApiResult<String> {
    let level: Level = match level.parse() {
        Ok(l) => l,
        Err(e) => {
            app.metrics()
                .level_requests
                .inc(&[("level", &level), ("outcome", "invalid")]);
            return Err(e.into());
        }
    };
    tracing::info!(%level, "received trigger level");

    let topic = level.topic();
    let url = format!("{}/publish/{topic}", app.cfg().controller.broker_url);
    let reply = app
        .client()
        .post_json(&url, &Publish::new(level.as_str()))
        .await
        .map_err(|e| {
            app.metrics()
                .level_requests
                .inc(&[("level", level.as_str()), ("outcome", "broker_error")]);
            e
        })?;

    if !reply.is_success() {
        app.metrics()
            .level_requests
            .inc(&[("level", level.as_str()), ("outcome", "broker_error")]);
        return Err(FlowlineError::Upstream(format!(
            "broker answered {} for publish to '{topic}'",
            reply.status
        ))
        .into());
    }

    let pending = app.pending().note_sent(topic);
    app.metrics()
        .level_requests
        .inc(&[("level", level.as_str()), ("outcome", "forwarded")]);
    tracing::info!(%topic, pending, "level forwarded to broker");

    Ok(format!("level '{level}' forwarded to broker at {url}\n"))
}

/// Consume one outstanding-message credit for the topic.
pub async fn ack(State(app): State<AppState>, Path(topic): Path<String>) -> ApiResult<String> {
    match app.pending().note_ack(&topic) {
        Ok(remaining) => {
            app.metrics()
                .acks
                .inc(&[("topic", &topic), ("outcome", "ok")]);
            tracing::info!(%topic, remaining, "ack received");
            Ok(format!(
                "ack received for topic '{topic}', remaining: {remaining}\n"
            ))
        }
        Err(e) => {
            app.metrics()
                .acks
                .inc(&[("topic", &topic), ("outcome", "rejected")]);
            Err(e.into())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PendingReport {
    pub topic: String,
    pub outstanding: u64,
}

/// Report the outstanding count for a topic.
pub async fn pending(
    State(app): State<AppState>,
    Path(topic): Path<String>,
) -> Json<PendingReport> {
    let outstanding = app.pending().outstanding(&topic);
    Json(PendingReport { topic, outstanding })
}
