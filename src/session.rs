// Per-session state owned by the shell layer. Core analysis functions
// never touch this; the caller records usage and conversation history
// after each operation.
use serde::Serialize;
use std::collections::BTreeMap;

/// One question/answer exchange in a session.
#[derive(Debug, Clone, Serialize)]
pub struct QaExchange {
    pub question: String,
    pub answer: String,
    pub confidence: f64,
    pub question_type: String,
}

/// Append-only session state: per-feature usage counters and the Q&A
/// conversation log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    usage: BTreeMap<String, u64>,
    qa_history: Vec<QaExchange>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_usage(&mut self, feature: &str) {
        *self.usage.entry(feature.to_string()).or_insert(0) += 1;
    }

    pub fn usage(&self, feature: &str) -> u64 {
        self.usage.get(feature).copied().unwrap_or(0)
    }

    pub fn total_usage(&self) -> u64 {
        self.usage.values().sum()
    }

    pub fn log_exchange(&mut self, exchange: QaExchange) {
        self.qa_history.push(exchange);
    }

    pub fn qa_history(&self) -> &[QaExchange] {
        &self.qa_history
    }
}
