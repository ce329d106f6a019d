//! Priority levels accepted by the trigger and controller.

use std::fmt;
use std::str::FromStr;

use crate::error::FlowlineError;

/// Priority of a triggered invocation. The level doubles as the broker topic
/// the controller publishes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    High,
    Low,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::High, Level::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Low => "low",
        }
    }

    /// Broker topic carrying messages for this level.
    pub fn topic(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = FlowlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Level::High),
            "low" => Ok(Level::Low),
            other => Err(FlowlineError::BadRequest(format!(
                "invalid priority level: {other} (use 'high' or 'low')"
            ))),
        }
    }
}
