use serde::Deserialize;

use flowline_core::error::{FlowlineError, Result};
use flowline_core::protocol::Level;

/// Which component this process runs. One process per role, as deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Trigger,
    Controller,
    Broker,
    Dispatcher,
    Functions,
    Agent,
}

impl NodeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Trigger => "trigger",
            NodeRole::Controller => "controller",
            NodeRole::Broker => "broker",
            NodeRole::Dispatcher => "dispatcher",
            NodeRole::Functions => "functions",
            NodeRole::Agent => "agent",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub version: u32,

    pub node: NodeSection,

    #[serde(default)]
    pub broker: BrokerSection,

    #[serde(default)]
    pub controller: ControllerSection,

    #[serde(default)]
    pub trigger: TriggerSection,

    #[serde(default)]
    pub dispatcher: DispatcherSection,

    #[serde(default)]
    pub agent: AgentSection,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FlowlineError::UnsupportedVersion);
        }
        self.broker.validate()?;
        self.trigger.validate()?;
        self.dispatcher.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    pub role: NodeRole,

    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerSection {
    /// Long-poll window for `/subscribe/{topic}` before replying null.
    #[serde(default = "default_subscribe_wait_ms")]
    pub subscribe_wait_ms: u64,
}

impl Default for BrokerSection {
    fn default() -> Self {
        Self {
            subscribe_wait_ms: default_subscribe_wait_ms(),
        }
    }
}

impl BrokerSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60000).contains(&self.subscribe_wait_ms) {
            return Err(FlowlineError::BadRequest(
                "broker.subscribe_wait_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

fn default_subscribe_wait_ms() -> u64 {
    5000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerSection {
    /// Base URL of the broker the controller publishes to.
    #[serde(default = "default_broker_url")]
    pub broker_url: String,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
        }
    }
}

fn default_broker_url() -> String {
    "http://mom:8000".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSection {
    /// Base URL of the controller the trigger forwards to.
    #[serde(default = "default_controller_url")]
    pub controller_url: String,

    #[serde(default = "default_forward_timeout_ms")]
    pub forward_timeout_ms: u64,

    /// Additional attempts after a failed forward.
    #[serde(default = "default_forward_retries")]
    pub forward_retries: u32,
}

impl Default for TriggerSection {
    fn default() -> Self {
        Self {
            controller_url: default_controller_url(),
            forward_timeout_ms: default_forward_timeout_ms(),
            forward_retries: default_forward_retries(),
        }
    }
}

impl TriggerSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=30000).contains(&self.forward_timeout_ms) {
            return Err(FlowlineError::BadRequest(
                "trigger.forward_timeout_ms must be between 100 and 30000".into(),
            ));
        }
        if self.forward_retries > 10 {
            return Err(FlowlineError::BadRequest(
                "trigger.forward_retries must be at most 10".into(),
            ));
        }
        Ok(())
    }
}

fn default_controller_url() -> String {
    "http://controller:8000".into()
}
fn default_forward_timeout_ms() -> u64 {
    2000
}
fn default_forward_retries() -> u32 {
    3
}

/// Binds a broker topic to a function endpoint the dispatcher invokes when a
/// message arrives on that topic.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicBinding {
    pub topic: String,
    pub invoke_url: String,
    /// Host header override for ingress-routed function endpoints.
    #[serde(default)]
    pub host_header: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatcherSection {
    #[serde(default = "default_broker_url")]
    pub broker_url: String,

    #[serde(default = "default_controller_url")]
    pub controller_url: String,

    /// Topics to consume. Defaults to one topic per priority level.
    #[serde(default = "default_topics")]
    pub topics: Vec<String>,

    /// Function endpoints keyed by topic. Topics without a binding are
    /// drained and acked but trigger no invocation.
    #[serde(default)]
    pub bindings: Vec<TopicBinding>,

    /// Pause between subscribe polls.
    #[serde(default = "default_poll_pause_ms")]
    pub poll_pause_ms: u64,
}

impl Default for DispatcherSection {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
            controller_url: default_controller_url(),
            topics: default_topics(),
            bindings: Vec::new(),
            poll_pause_ms: default_poll_pause_ms(),
        }
    }
}

impl DispatcherSection {
    pub fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(FlowlineError::BadRequest(
                "dispatcher.topics must not be empty".into(),
            ));
        }
        if self.poll_pause_ms > 60000 {
            return Err(FlowlineError::BadRequest(
                "dispatcher.poll_pause_ms must be at most 60000".into(),
            ));
        }
        for b in &self.bindings {
            if !self.topics.contains(&b.topic) {
                return Err(FlowlineError::BadRequest(format!(
                    "dispatcher binding refers to unconsumed topic: {}",
                    b.topic
                )));
            }
            if b.invoke_url.is_empty() {
                return Err(FlowlineError::BadRequest(format!(
                    "dispatcher binding for topic {} has an empty invoke_url",
                    b.topic
                )));
            }
        }
        Ok(())
    }

    pub fn binding_for(&self, topic: &str) -> Option<&TopicBinding> {
        self.bindings.iter().find(|b| b.topic == topic)
    }
}

fn default_topics() -> Vec<String> {
    Level::ALL.iter().map(|l| l.topic().to_string()).collect()
}
fn default_poll_pause_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentSection {
    /// Prometheus instant-query endpoint scraped for node scores.
    #[serde(default = "default_prometheus_url")]
    pub prometheus_url: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            prometheus_url: default_prometheus_url(),
        }
    }
}

fn default_prometheus_url() -> String {
    "http://prometheus-server.default.svc.cluster.local/api/v1/query".into()
}
