//! Shared application state for a flowline node.
//!
//! Every component's state lives here regardless of role: the pieces are
//! cheap to build, and tests exercise several roles against one state.

use std::sync::Arc;
use std::time::Duration;

use flowline_core::error::Result;

use crate::broker::TopicStore;
use crate::config::{NodeConfig, NodeRole};
use crate::controller::AckLedger;
use crate::functions::{FunctionRegistry, Greeter};
use crate::http::HttpClient;
use crate::obs::PipelineMetrics;

// Roles other than the trigger talk to local-cluster peers; give them a
// roomier timeout than the trigger's forward budget.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: NodeConfig,
    metrics: PipelineMetrics,
    topics: TopicStore,
    pending: AckLedger,
    functions: FunctionRegistry,
    client: HttpClient,
}

impl AppState {
    /// Build application state. Returns Result so main can handle errors
    /// gracefully (no panic).
    pub fn new(cfg: NodeConfig) -> Result<Self> {
        let timeout_ms = match cfg.node.role {
            NodeRole::Trigger => cfg.trigger.forward_timeout_ms,
            _ => DEFAULT_TIMEOUT_MS,
        };
        let client = HttpClient::new(Duration::from_millis(timeout_ms))?;

        let functions = FunctionRegistry::new();
        functions.register(Arc::new(Greeter::stdout()));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: PipelineMetrics::default(),
                topics: TopicStore::new(),
                pending: AckLedger::new(),
                functions,
                client,
            }),
        })
    }

    pub fn cfg(&self) -> &NodeConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.inner.metrics
    }

    pub fn topics(&self) -> &TopicStore {
        &self.inner.topics
    }

    pub fn pending(&self) -> &AckLedger {
        &self.inner.pending
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.inner.functions
    }

    pub fn client(&self) -> &HttpClient {
        &self.inner.client
    }

    /// Extra metric series rendered alongside the registry: outstanding-ack
    /// counts per topic.
    pub fn metrics_extra(&self) -> Vec<(String, u64)> {
        self.inner
            .pending
            .snapshot()
            .into_iter()
            .map(|(topic, count)| {
                (
                    format!("flowline_pending_acks{{topic=\"{topic}\"}}"),
                    count,
                )
            })
            .collect()
    }
}
