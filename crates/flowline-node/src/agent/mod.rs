//! Agent: scrapes node metrics from a Prometheus endpoint and serves
//! per-instance USE scores.
//!
//! Query failures degrade to empty result sets so `/use_score` keeps
//! answering while the metrics backend is down.

pub mod score;

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;

use crate::app_state::AppState;
use score::{join_scores, SeriesMap, UseReport};

pub const CPU_QUERY: &str =
    r#"100 - (avg by(instance) (irate(node_cpu_seconds_total{mode="idle"}[5m])) * 100)"#;
pub const MEM_QUERY: &str = r#"100 - (avg by(instance) (node_memory_MemAvailable_bytes) * 100 / avg by(instance) (node_memory_MemTotal_bytes))"#;
pub const CPU_SATURATION_QUERY: &str =
    r#"avg by(instance) (irate(node_cpu_seconds_total{mode="iowait"}[5m])) * 100"#;
pub const ERRORS_QUERY: &str = r#"sum by(instance) (rate(node_disk_io_errors_total[5m]))"#;

/// Run one instant query and flatten the result vector to
/// `instance -> value`. Any failure yields an empty map.
async fn instant_query(app: &AppState, query: &str) -> SeriesMap {
    let url = &app.cfg().agent.prometheus_url;
    let data = match app.client().get_json(url, &[("query", query)]).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%query, error = %e, "prometheus query failed");
            return SeriesMap::new();
        }
    };

    if data.get("status").and_then(|s| s.as_str()) != Some("success") {
        tracing::warn!(%query, "prometheus query returned non-success status");
        return SeriesMap::new();
    }

    let mut out = SeriesMap::new();
    let results = data
        .pointer("/data/result")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();
    for item in results {
        let instance = item
            .pointer("/metric/instance")
            .and_then(|i| i.as_str())
            .unwrap_or("unknown")
            .to_string();
        // Instant vectors carry [timestamp, "value-as-string"].
        let value = item
            .pointer("/value/1")
            .and_then(|v| v.as_str())
            .and_then(|v| v.parse::<f64>().ok());
        if let Some(v) = value {
            out.insert(instance, v);
        }
    }
    out
}

/// `GET /use_score`
pub async fn use_score(State(app): State<AppState>) -> Json<BTreeMap<String, UseReport>> {
    let (cpu, mem, sat, err) = tokio::join!(
        instant_query(&app, CPU_QUERY),
        instant_query(&app, MEM_QUERY),
        instant_query(&app, CPU_SATURATION_QUERY),
        instant_query(&app, ERRORS_QUERY),
    );

    Json(join_scores(&cpu, &mem, &sat, &err))
}
