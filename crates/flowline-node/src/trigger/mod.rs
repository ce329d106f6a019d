//! Trigger: the pipeline's HTTP front door.
//!
//! `GET /trigger?level=high|low` forwards the level to the controller with a
//! bounded timeout and retries. The trigger always answers 200 with a text
//! hint, even for unknown levels; failures on the controller hop are logged
//! and surfaced through metrics, not to the caller.

use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::Instrument;

use flowline_core::protocol::Level;

use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct TriggerQuery {
    #[serde(default)]
    pub level: Option<String>,
}

pub async fn handle(State(app): State<AppState>, Query(q): Query<TriggerQuery>) -> String {
    let level = match q.level.as_deref().map(str::parse::<Level>) {
        Some(Ok(level)) => level,
        _ => {
            return "Please provide 'level' as either 'low' or 'high'\n".to_string();
        }
    };

    forward(&app, level).await;
    format!("Trigger received for level: {level}\n")
}

/// Forward one level to the controller inside a span carrying the level and
/// target URL.
async fn forward(app: &AppState, level: Level) {
    let url = format!("{}/{level}", app.cfg().trigger.controller_url);
    let retries = app.cfg().trigger.forward_retries;

    let span = tracing::info_span!("trigger_forward", %level, controller_url = %url);
    async {
        match app.client().get_with_retries(&url, retries).await {
            Ok(reply) => {
                app.metrics().trigger_forwards.inc(&[
                    ("level", level.as_str()),
                    ("outcome", if reply.is_success() { "ok" } else { "error" }),
                ]);
                tracing::info!(
                    status = reply.status,
                    body = %reply.body.trim(),
                    "forwarded to controller"
                );
            }
            Err(e) => {
                app.metrics()
                    .trigger_forwards
                    .inc(&[("level", level.as_str()), ("outcome", "unreachable")]);
                tracing::error!(error = %e, "controller unreachable");
            }
        }
    }
    .instrument(span)
    .await
}
