//! Completion provider trait definition.

use async_trait::async_trait;

use super::CompletionRequest;
use crate::error::ProviderError;

/// Core trait for completion providers.
///
/// Request/response only: no streaming. Failures surface as [`ProviderError`]
/// and are handled at the call site.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider ID (e.g. `openai`), used in user-facing messages.
    fn id(&self) -> &str;

    /// Generate a completion for the request.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
