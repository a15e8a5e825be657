//! Error types for the assistant core.

use pagepilot_config::ConfigError;
use pagepilot_dom::DomError;
use pagepilot_protocols::{ProviderError, StoreError};
use thiserror::Error;

/// Errors raised while loading a page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Umbrella error for session plumbing.
///
/// Action handlers never return these: their results are reported as
/// [`crate::ActionOutcome`]s.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
