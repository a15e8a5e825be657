//! Chat transcript scoped to one page URL.

use std::sync::Arc;

use pagepilot_protocols::{ChatMessage, KeyValueStore, StoreError};
use serde_json::Value;
use tracing::{debug, warn};

/// Store key holding the transcript messages.
pub const CHAT_MESSAGES_KEY: &str = "chatMessages";
/// Store key holding the URL the stored transcript belongs to.
pub const PAGE_URL_KEY: &str = "pageUrl";

/// Ordered chat messages, persisted after every change.
///
/// Persistence is best effort: a failed store write is logged and the
/// in-memory transcript stays authoritative.
pub struct Transcript {
    messages: Vec<ChatMessage>,
    page_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl Transcript {
    /// An empty transcript for `page_url`.
    pub fn new(store: Arc<dyn KeyValueStore>, page_url: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            page_url: page_url.into(),
            store,
        }
    }

    /// Load the stored transcript if it belongs to `page_url`; otherwise
    /// start empty.
    pub async fn restore(store: Arc<dyn KeyValueStore>, page_url: impl Into<String>) -> Self {
        let mut transcript = Self::new(store, page_url);
        match transcript.load().await {
            Ok(Some(messages)) => {
                debug!(count = messages.len(), url = %transcript.page_url, "Restored transcript");
                transcript.messages = messages;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to restore transcript: {}", e),
        }
        transcript
    }

    async fn load(&self) -> Result<Option<Vec<ChatMessage>>, StoreError> {
        let stored_url = self.store.get(PAGE_URL_KEY).await?;
        if stored_url.as_ref().and_then(Value::as_str) != Some(self.page_url.as_str()) {
            return Ok(None);
        }
        match self.store.get(CHAT_MESSAGES_KEY).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self) {
        let result: Result<(), StoreError> = async {
            let value = serde_json::to_value(&self.messages)?;
            self.store.set(CHAT_MESSAGES_KEY, value).await?;
            self.store
                .set(PAGE_URL_KEY, Value::String(self.page_url.clone()))
                .await
        }
        .await;
        if let Err(e) = result {
            warn!("Failed to save transcript: {}", e);
        }
    }

    /// Append a message; returns its index.
    pub async fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.save().await;
        self.messages.len() - 1
    }

    /// Append an assistant message; returns its index.
    pub async fn say(&mut self, text: impl Into<String>) -> usize {
        self.push(ChatMessage::ai(text)).await
    }

    /// Remove the message at `index`.
    pub async fn remove(&mut self, index: usize) -> Option<ChatMessage> {
        if index >= self.messages.len() {
            return None;
        }
        let removed = self.messages.remove(index);
        self.save().await;
        Some(removed)
    }

    /// Replace the text of the message at `index`.
    pub async fn replace(&mut self, index: usize, text: impl Into<String>) {
        if let Some(message) = self.messages.get_mut(index) {
            message.text = text.into();
            self.save().await;
        }
    }

    /// Empty the transcript and drop it from the store.
    pub async fn clear(&mut self) {
        self.messages.clear();
        if let Err(e) = self.store.remove(&[CHAT_MESSAGES_KEY, PAGE_URL_KEY]).await {
            warn!("Failed to remove stored transcript: {}", e);
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }
}

impl std::fmt::Debug for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcript")
            .field("page_url", &self.page_url)
            .field("messages", &self.messages)
            .field("store", &self.store.id())
            .finish()
    }
}
