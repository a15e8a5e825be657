//! In-memory key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use pagepilot_protocols::error::StoreError;
use pagepilot_protocols::store::KeyValueStore;

/// Map-backed store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.lock().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_and_remove() {
        let store = MemoryStore::new();
        store.set("pageUrl", json!("https://example.com/")).await.unwrap();
        store.set("chatMessages", json!([])).await.unwrap();
        assert_eq!(store.keys(), vec!["chatMessages", "pageUrl"]);

        store.remove(&["chatMessages", "pageUrl"]).await.unwrap();
        assert!(store.is_empty());
        assert!(store.get("pageUrl").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.set("a", json!(1)).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.len(), 0);
    }
}
