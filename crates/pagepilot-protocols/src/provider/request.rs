//! Completion request type.

use serde::{Deserialize, Serialize};

/// Request for a single completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System prompt.
    pub system: String,

    /// User prompt.
    pub prompt: String,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new completion request.
    pub fn new(system: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
