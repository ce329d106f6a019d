//! Node config: strict YAML, loaded once at boot.

pub mod schema;

use std::fs;
use std::path::Path;

use flowline_core::error::{FlowlineError, Result};

pub use schema::{
    AgentSection, BrokerSection, ControllerSection, DispatcherSection, NodeConfig, NodeRole,
    NodeSection, TopicBinding, TriggerSection,
};

/// Read, parse, and validate a config file. Errors name the offending path.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<NodeConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        FlowlineError::Internal(format!("read config {} failed: {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<NodeConfig> {
    let cfg: NodeConfig = serde_yaml::from_str(s)
        .map_err(|e| FlowlineError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
