#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

//! Dispatcher poll cycle against mocked broker/function/controller endpoints.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio::sync::watch;

use flowline_node::app_state::AppState;
use flowline_node::config;
use flowline_node::dispatch::{self, poll_once, PollOutcome};

/// Mock both topic subscriptions as empty long-polls.
async fn mock_empty_subscriptions(server: &MockServer) {
    for topic in ["high", "low"] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/subscribe/{topic}"));
                then.status(200).json_body(json!({"message": null}));
            })
            .await;
    }
}

fn state_for(base: &str) -> AppState {
    let yaml = format!(
        r#"
version: 1
node:
  role: dispatcher
dispatcher:
  broker_url: "{base}"
  controller_url: "{base}"
  topics: ["high", "low"]
  bindings:
    - topic: "high"
      invoke_url: "{base}/fn/greeter"
      host_header: "greeter.default.example.com"
"#
    );
    AppState::new(config::load_from_str(&yaml).unwrap()).unwrap()
}

#[tokio::test]
async fn high_message_invokes_function_and_acks() {
    let server = MockServer::start_async().await;
    let state = state_for(&server.base_url());

    let subscribe = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscribe/high");
            then.status(200).json_body(json!({"message": "high"}));
        })
        .await;
    let invoke = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/fn/greeter")
                .header("host", "greeter.default.example.com");
            then.status(200).body("Hello, world!\n");
        })
        .await;
    let ack = server
        .mock_async(|when, then| {
            when.method(POST).path("/ack/high");
            then.status(200).body("ack received for topic 'high', remaining: 0\n");
        })
        .await;

    let outcome = poll_once(&state, "high").await.unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Delivered {
            topic: "high".into(),
            invoked: true
        }
    );

    subscribe.assert_async().await;
    invoke.assert_async().await;
    ack.assert_async().await;
}

#[tokio::test]
async fn null_poll_neither_invokes_nor_acks() {
    let server = MockServer::start_async().await;
    let state = state_for(&server.base_url());

    server
        .mock_async(|when, then| {
            when.method(GET).path("/subscribe/high");
            then.status(200).json_body(json!({"message": null}));
        })
        .await;
    let invoke = server
        .mock_async(|when, then| {
            when.method(GET).path("/fn/greeter");
            then.status(200).body("Hello, world!\n");
        })
        .await;
    let ack = server
        .mock_async(|when, then| {
            when.method(POST).path("/ack/high");
            then.status(200);
        })
        .await;

    let outcome = poll_once(&state, "high").await.unwrap();
    assert_eq!(outcome, PollOutcome::Empty);
    assert_eq!(invoke.hits_async().await, 0);
    assert_eq!(ack.hits_async().await, 0);
}

#[tokio::test]
async fn unbound_topic_is_acked_but_not_invoked() {
    let server = MockServer::start_async().await;
    let state = state_for(&server.base_url());

    server
        .mock_async(|when, then| {
            when.method(GET).path("/subscribe/low");
            then.status(200).json_body(json!({"message": "low"}));
        })
        .await;
    let ack = server
        .mock_async(|when, then| {
            when.method(POST).path("/ack/low");
            then.status(200);
        })
        .await;

    let outcome = poll_once(&state, "low").await.unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Delivered {
            topic: "low".into(),
            invoked: false
        }
    );
    assert_eq!(ack.hits_async().await, 1);
}

#[tokio::test]
async fn run_drains_consumers_on_shutdown() {
    let server = MockServer::start_async().await;
    mock_empty_subscriptions(&server).await;
    let state = state_for(&server.base_url());

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(dispatch::run(state, rx));

    // Let the consumers start polling, then signal shutdown.
    tokio::time::sleep(Duration::from_millis(100)).await;
    tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("dispatcher did not drain after shutdown signal")
        .unwrap();
}

#[tokio::test]
async fn run_stops_when_shutdown_sender_is_dropped() {
    let server = MockServer::start_async().await;
    mock_empty_subscriptions(&server).await;
    let state = state_for(&server.base_url());

    let (tx, rx) = watch::channel(false);
    drop(tx);

    // A dead shutdown channel must stop the consumers, not spin them.
    tokio::time::timeout(Duration::from_secs(5), tokio::spawn(dispatch::run(state, rx)))
        .await
        .expect("dispatcher did not stop on closed shutdown channel")
        .unwrap();
}

#[tokio::test]
async fn broker_error_surfaces_as_upstream() {
    let server = MockServer::start_async().await;
    let state = state_for(&server.base_url());

    server
        .mock_async(|when, then| {
            when.method(GET).path("/subscribe/high");
            then.status(500).body("boom");
        })
        .await;

    let err = poll_once(&state, "high").await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "UPSTREAM_UNAVAILABLE");
}
