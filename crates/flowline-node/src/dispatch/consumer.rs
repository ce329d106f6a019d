use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use flowline_core::error::{FlowlineError, Result};
use flowline_core::protocol::{AckNote, SubscribeReply};

use crate::app_state::AppState;

/// What a single subscribe poll produced.
#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// Long-poll elapsed with no message.
    Empty,
    /// A message was consumed (and acked).
    Delivered { topic: String, invoked: bool },
}

/// One subscribe/invoke/ack cycle for a topic. Split out from the consumer
/// loop so it can be driven directly in tests.
pub async fn poll_once(app: &AppState, topic: &str) -> Result<PollOutcome> {
    let cfg = &app.cfg().dispatcher;

    let url = format!("{}/subscribe/{topic}", cfg.broker_url);
    let reply = app.client().get_text(&url).await?;
    if reply.status != 200 {
        return Err(FlowlineError::Upstream(format!(
            "broker answered {} for subscribe on '{topic}'",
            reply.status
        )));
    }
    let parsed: SubscribeReply = serde_json::from_str(&reply.body)
        .map_err(|e| FlowlineError::BadRequest(format!("invalid subscribe reply: {e}")))?;

    let Some(message) = parsed.message else {
        return Ok(PollOutcome::Empty);
    };
    tracing::info!(%topic, %message, "message received");

    let mut invoked = false;
    if let Some(binding) = cfg.binding_for(topic) {
        let started = Instant::now();
        match app
            .client()
            .get_text_with_host(&binding.invoke_url, binding.host_header.as_deref())
            .await
        {
            Ok(resp) => {
                invoked = true;
                app.metrics()
                    .invocations
                    .inc(&[("topic", topic), ("status", &resp.status.to_string())]);
                tracing::info!(
                    %topic,
                    status = resp.status,
                    body = %resp.body.trim(),
                    "function invoked"
                );
            }
            Err(e) => {
                app.metrics()
                    .invocations
                    .inc(&[("topic", topic), ("status", "unreachable")]);
                tracing::error!(%topic, error = %e, "function invocation failed");
            }
        }
        app.metrics()
            .invocation_latency
            .observe(&[("topic", topic)], started.elapsed());
    }

    // The message is consumed either way, so it is always acked.
    let ack_url = format!("{}/ack/{topic}", cfg.controller_url);
    match app.client().post_json(&ack_url, &AckNote::received()).await {
        Ok(resp) if resp.is_success() => {
            tracing::debug!(%topic, "ack sent");
        }
        Ok(resp) => {
            tracing::warn!(%topic, status = resp.status, "ack rejected by controller");
        }
        Err(e) => {
            tracing::warn!(%topic, error = %e, "ack delivery failed");
        }
    }

    Ok(PollOutcome::Delivered {
        topic: topic.to_string(),
        invoked,
    })
}

/// Run one consumer task per configured topic until shutdown is signalled.
pub async fn run(app: AppState, shutdown: watch::Receiver<bool>) {
    let topics = app.cfg().dispatcher.topics.clone();
    let mut tasks = Vec::with_capacity(topics.len());
    for topic in topics {
        tasks.push(tokio::spawn(consume_topic(
            app.clone(),
            topic,
            shutdown.clone(),
        )));
    }
    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "consumer task panicked");
        }
    }
    tracing::info!("dispatcher stopped");
}

async fn consume_topic(app: AppState, topic: String, mut shutdown: watch::Receiver<bool>) {
    tracing::info!(%topic, "waiting for messages");
    let pause = Duration::from_millis(app.cfg().dispatcher.poll_pause_ms);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                // A closed channel means no shutdown signal is coming; stop
                // rather than spin on the dead receiver.
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            result = poll_once(&app, &topic) => {
                match result {
                    Ok(PollOutcome::Empty) | Ok(PollOutcome::Delivered { .. }) => {}
                    Err(e) => {
                        // Broker unreachable or garbled; back off before the
                        // next poll so a dead broker does not spin the loop.
                        tracing::warn!(%topic, error = %e, "poll failed");
                        tokio::time::sleep(pause).await;
                    }
                }
            }
        }
    }
    tracing::info!(%topic, "consumer stopped");
}
