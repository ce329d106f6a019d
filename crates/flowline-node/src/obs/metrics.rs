//! Minimal metrics registry for the pipeline.
//!
//! No external crates; counter/gauge/histogram types with dynamic labels
//! backed by `DashMap`. Labels are flattened into sorted key vectors for
//! deterministic ordering. Histogram buckets are fixed in milliseconds
//! (function invocations are HTTP round trips, not microsecond work).

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn format_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (mainly for tests).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}{{{}}} {val}", format_labels(r.key()));
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} gauge");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}{{{}}} {val}", format_labels(r.key()));
        }
    }
}

// 1ms .. 10s, HTTP-call scale.
const BUCKETS_MILLIS: [u64; 9] = [1, 5, 10, 50, 100, 250, 500, 1_000, 10_000];

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration, incrementing cumulative buckets (millisecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let millis = duration.as_millis() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(millis, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MILLIS.iter().enumerate() {
            if millis <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for r in self.map.iter() {
            let hist = r.value();
            let label_str = format_labels(r.key());
            let prefix = if label_str.is_empty() {
                String::new()
            } else {
                format!("{label_str},")
            };

            for (i, &le) in BUCKETS_MILLIS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"{le}\"}} {count}");
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_sum{{{label_str}}} {sum}");
            let _ = writeln!(out, "{name}_count{{{label_str}}} {count}");
        }
    }
}

/// All pipeline metrics, one instance per process.
#[derive(Default)]
pub struct PipelineMetrics {
    /// Messages accepted by the broker, per topic.
    pub published: CounterVec,
    /// Publishes rejected (missing/empty message), per topic.
    pub publish_rejections: CounterVec,
    /// Messages handed to a subscriber, per topic.
    pub delivered: CounterVec,
    /// Subscribe long-polls that elapsed empty, per topic.
    pub subscribe_timeouts: CounterVec,
    /// Controller level requests, per level and outcome.
    pub level_requests: CounterVec,
    /// Acks processed by the controller, per topic and outcome.
    pub acks: CounterVec,
    /// Trigger forwards to the controller, per level and outcome.
    pub trigger_forwards: CounterVec,
    /// Dispatcher function invocations, per topic and HTTP status.
    pub invocations: CounterVec,
    /// Function invocation latency (milliseconds), per topic.
    pub invocation_latency: HistogramVec,
    /// Function host invocations, per function and outcome.
    pub function_calls: CounterVec,
    draining: AtomicBool,
}

impl PipelineMetrics {
    /// Mark draining state (readyz turns 503).
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered metrics plus extra preformatted series.
    pub fn render(&self, extra: &[(String, u64)]) -> String {
        let mut out = String::new();
        self.published.render("flowline_published_total", &mut out);
        self.publish_rejections
            .render("flowline_publish_rejections_total", &mut out);
        self.delivered.render("flowline_delivered_total", &mut out);
        self.subscribe_timeouts
            .render("flowline_subscribe_timeouts_total", &mut out);
        self.level_requests
            .render("flowline_level_requests_total", &mut out);
        self.acks.render("flowline_acks_total", &mut out);
        self.trigger_forwards
            .render("flowline_trigger_forwards_total", &mut out);
        self.invocations
            .render("flowline_invocations_total", &mut out);
        self.invocation_latency
            .render("flowline_invocation_duration_millis", &mut out);
        self.function_calls
            .render("flowline_function_calls_total", &mut out);

        let _ = writeln!(
            out,
            "# TYPE flowline_draining gauge\nflowline_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        for (k, v) in extra {
            let _ = writeln!(out, "{k} {v}");
        }
        out
    }
}
