//! # PagePilot Protocols
//!
//! Core protocol definitions (traits) for PagePilot.
//! Contains only interface definitions and plain data types - no implementations.
//!
//! ## Core Traits
//!
//! - [`CompletionProvider`] - Trait for completion provider implementations
//! - [`KeyValueStore`] - Trait for persistent key-value storage implementations

pub mod error;
pub mod provider;
pub mod store;
pub mod types;

// Re-export core traits
pub use provider::{CompletionProvider, CompletionRequest};
pub use store::KeyValueStore;
pub use error::{ProviderError, StoreError};
pub use types::*;
