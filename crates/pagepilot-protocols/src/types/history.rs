//! Action history entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An `(action, target)` pair as recorded in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: String,
    pub target: String,
}

/// What a history entry records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// The user sent a chat message.
    Message { content: String },
    /// A single command was dispatched.
    Action { action: String, target: String },
    /// All commands extracted from one model response.
    AiActions { actions: Vec<ActionRecord> },
}

/// One entry in the append-only action history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub event: HistoryEvent,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn now(event: HistoryEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }

    /// Short kind name (`message`, `action`, `ai_actions`).
    pub fn kind(&self) -> &'static str {
        match self.event {
            HistoryEvent::Message { .. } => "message",
            HistoryEvent::Action { .. } => "action",
            HistoryEvent::AiActions { .. } => "ai_actions",
        }
    }
}
