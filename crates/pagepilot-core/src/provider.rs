//! Scripted completion provider.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pagepilot_protocols::{CompletionProvider, CompletionRequest, ProviderError};
use tokio::time::Instant;
use tracing::debug;

/// One canned reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// A request the provider received, with the (tokio) time it arrived.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: CompletionRequest,
    pub at: Instant,
}

/// Replays canned completions in order.
///
/// When the script runs out, the provider either echoes the prompt back
/// (the default) or fails, depending on [`ScriptedProvider::fail_when_empty`].
pub struct ScriptedProvider {
    id: String,
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    latency: Duration,
    fail_when_empty: bool,
}

impl ScriptedProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            fail_when_empty: false,
        }
    }

    /// A provider that answers with `replies`, in order.
    pub fn with_replies<I, S>(id: impl Into<String>, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new(id);
        provider
            .replies
            .lock()
            .extend(replies.into_iter().map(|r| ScriptedReply::Text(r.into())));
        provider
    }

    /// Queue another reply.
    pub fn push(&self, reply: ScriptedReply) {
        self.replies.lock().push_back(reply);
    }

    /// Delay every completion by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail instead of echoing once the script is exhausted.
    pub fn fail_when_empty(mut self) -> Self {
        self.fail_when_empty = true;
        self
    }

    /// Every request received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.lock().push(RecordedCall {
            request: request.clone(),
            at: Instant::now(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let next = self.replies.lock().pop_front();
        debug!(provider = %self.id, scripted = next.is_some(), "Scripted completion");
        match next {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(message)) => Err(ProviderError::ApiError {
                status: 500,
                message,
            }),
            None if self.fail_when_empty => Err(ProviderError::InvalidResponse(
                "script exhausted".to_string(),
            )),
            None => Ok(request.prompt),
        }
    }
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("id", &self.id)
            .field("remaining", &self.remaining())
            .field("calls", &self.call_count())
            .finish()
    }
}
