use dashmap::DashMap;

use flowline_core::error::{FlowlineError, Result};

/// Outstanding-message counters, one per topic. Counters never go negative:
/// an ack with nothing outstanding is an error.
#[derive(Default)]
pub struct AckLedger {
    outstanding: DashMap<String, u64>,
}

impl AckLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sent message; returns the new outstanding count.
    pub fn note_sent(&self, topic: &str) -> u64 {
        let mut count = self.outstanding.entry(topic.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Record an ack; returns the remaining count.
    pub fn note_ack(&self, topic: &str) -> Result<u64> {
        let mut count = self.outstanding.entry(topic.to_string()).or_insert(0);
        if *count == 0 {
            return Err(FlowlineError::BadRequest(format!(
                "no outstanding messages for topic '{topic}'"
            )));
        }
        *count -= 1;
        Ok(*count)
    }

    pub fn outstanding(&self, topic: &str) -> u64 {
        self.outstanding.get(topic).map(|c| *c).unwrap_or(0)
    }

    /// Snapshot of all counters (for /metrics extras).
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.outstanding
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_then_acked_balances_out() {
        let ledger = AckLedger::new();
        assert_eq!(ledger.note_sent("high"), 1);
        assert_eq!(ledger.note_sent("high"), 2);
        assert_eq!(ledger.note_ack("high").unwrap(), 1);
        assert_eq!(ledger.outstanding("high"), 1);
    }

    #[test]
    fn ack_without_outstanding_is_rejected() {
        let ledger = AckLedger::new();
        let err = ledger.note_ack("high").unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
        assert_eq!(ledger.outstanding("high"), 0);
    }

    #[test]
    fn topics_count_independently() {
        let ledger = AckLedger::new();
        ledger.note_sent("high");
        assert_eq!(ledger.outstanding("low"), 0);
    }
}
