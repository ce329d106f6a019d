use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

use flowline_core::error::{FlowlineError, Result};

/// One topic's queue. The receiver sits behind an async mutex so concurrent
/// subscribers compete for messages instead of duplicating them.
struct Topic {
    tx: mpsc::UnboundedSender<String>,
    rx: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl Topic {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

/// Topic registry: `topic name -> queue`, created on first use.
#[derive(Default)]
pub struct TopicStore {
    topics: DashMap<String, Arc<Topic>>,
}

impl TopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn topic(&self, name: &str) -> Arc<Topic> {
        self.topics
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Topic::new()))
            .clone()
    }

    /// Append a message to the topic queue.
    pub fn push(&self, name: &str, message: String) -> Result<()> {
        self.topic(name)
            .tx
            .send(message)
            .map_err(|_| FlowlineError::Internal(format!("topic queue closed: {name}")))
    }

    /// Wait up to `window` for the next message on the topic. `None` means
    /// the long-poll elapsed empty.
    ///
    /// The window covers lock wait plus receive, so concurrent subscribers
    /// on one topic each get the same bound instead of queuing full windows
    /// behind each other.
    pub async fn pop_within(&self, name: &str, window: Duration) -> Option<String> {
        let topic = self.topic(name);
        timeout(window, async {
            let mut rx = topic.rx.lock().await;
            rx.recv().await
        })
        .await
        .ok()
        .flatten()
    }
}
