//! Broker and controller wire messages (JSON bodies).

use serde::{Deserialize, Serialize};

use crate::error::{FlowlineError, Result};

/// Body of `POST /publish/{topic}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publish {
    pub message: String,
}

impl Publish {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Publishes with an empty message are rejected the same way the broker
    /// rejects a missing `message` field.
    pub fn validate(&self) -> Result<()> {
        if self.message.is_empty() {
            return Err(FlowlineError::BadRequest("missing message".into()));
        }
        Ok(())
    }
}

/// Broker reply to a successful publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub status: String,
    pub topic: String,
}

impl PublishReceipt {
    pub fn published(topic: impl Into<String>) -> Self {
        Self {
            status: "published".into(),
            topic: topic.into(),
        }
    }
}

/// Broker reply to `GET /subscribe/{topic}`. `message` is `null` when the
/// long-poll window elapsed without a delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeReply {
    pub message: Option<String>,
}

/// Body of `POST /ack/{topic}` sent by the dispatcher after it finishes a
/// message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckNote {
    pub status: String,
}

impl AckNote {
    pub fn received() -> Self {
        Self {
            status: "received".into(),
        }
    }
}

/// JSON error body returned by node HTTP surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub msg: String,
}

impl ErrorBody {
    pub fn from_error(err: &FlowlineError) -> Self {
        Self {
            code: err.client_code().as_str().to_string(),
            msg: err.to_string(),
        }
    }
}
