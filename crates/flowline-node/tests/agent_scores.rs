#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

//! Agent `/use_score` against a mocked Prometheus query endpoint.

use httpmock::prelude::*;
use serde_json::json;

use flowline_node::agent::{CPU_QUERY, CPU_SATURATION_QUERY};
use flowline_node::app_state::AppState;
use flowline_node::{config, router};

fn instant_vector(instance: &str, value: f64) -> serde_json::Value {
    json!({
        "status": "success",
        "data": {
            "result": [
                {
                    "metric": {"instance": instance},
                    "value": [1693300000.0, value.to_string()]
                }
            ]
        }
    })
}

#[tokio::test]
async fn use_score_joins_partial_query_results() {
    let prometheus = MockServer::start_async().await;

    prometheus
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/query")
                .query_param("query", CPU_QUERY);
            then.status(200).json_body(instant_vector("node1", 40.0));
        })
        .await;
    prometheus
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/query")
                .query_param("query", CPU_SATURATION_QUERY);
            then.status(200).json_body(instant_vector("node1", 5.0));
        })
        .await;
    // Memory and disk-error queries fall through to the mock server's 404
    // and must degrade to empty series, not fail the request.

    let yaml = format!(
        r#"
version: 1
node:
  role: agent
agent:
  prometheus_url: "{}/api/v1/query"
"#,
        prometheus.base_url()
    );
    let state = AppState::new(config::load_from_str(&yaml).unwrap()).unwrap();
    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let scores: serde_json::Value = reqwest::get(format!("http://{addr}/use_score"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(scores["node1"]["cpu_utilization_percent"], 40.0);
    assert_eq!(scores["node1"]["cpu_saturation_iowait_percent"], 5.0);
    assert_eq!(scores["node1"]["memory_utilization_percent"], 0.0);
    assert_eq!(scores["node1"]["use_score"], 45.0);
}
