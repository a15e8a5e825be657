//! Append-only action history.

use std::sync::Arc;

use pagepilot_protocols::{HistoryEntry, HistoryEvent, KeyValueStore, StoreError};
use tracing::{debug, warn};

/// Store key holding the serialized history.
pub const HISTORY_KEY: &str = "userActionHistory";

/// Process-wide log of user messages and dispatched actions. Fed back
/// into prompts as recency context.
pub struct ActionHistory {
    entries: Vec<HistoryEntry>,
    store: Arc<dyn KeyValueStore>,
}

impl ActionHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    /// Load the stored history, starting empty if there is none or it
    /// cannot be read.
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let mut history = Self::new(store);
        match history.load().await {
            Ok(entries) => history.entries = entries,
            Err(e) => warn!("Failed to restore action history: {}", e),
        }
        history
    }

    async fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        match self.store.get(HISTORY_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append an event stamped now and persist the log.
    pub async fn record(&mut self, event: HistoryEvent) {
        let entry = HistoryEntry::now(event);
        debug!(kind = entry.kind(), "Recording history entry");
        self.entries.push(entry);
        self.save().await;
    }

    async fn save(&self) {
        let result: Result<(), StoreError> = async {
            let value = serde_json::to_value(&self.entries)?;
            self.store.set(HISTORY_KEY, value).await
        }
        .await;
        if let Err(e) = result {
            warn!("Failed to save action history: {}", e);
        }
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Drop every entry and persist the empty log.
    pub async fn clear(&mut self) {
        self.entries.clear();
        self.save().await;
    }
}

impl std::fmt::Debug for ActionHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionHistory")
            .field("entries", &self.entries.len())
            .field("store", &self.store.id())
            .finish()
    }
}
