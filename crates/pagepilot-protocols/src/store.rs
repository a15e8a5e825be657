//! Key-value store protocol definitions.
//!
//! Stores hold the persisted chat transcript, action history and settings.
//! There are no transactional guarantees: last write wins.

use async_trait::async_trait;

use crate::error::StoreError;

/// Core trait for key-value stores.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Read a value. Missing keys are `None`, not an error.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Write a value, replacing any previous value.
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Remove the given keys. Missing keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), StoreError>;
}
