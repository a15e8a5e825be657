//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Assistant behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Language every `translate` command translates into.
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Token budget for chat and summary completions.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// How many recent history entries are fed back into prompts.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Cap (in characters) on the page text sent as context.
    #[serde(default = "default_context_text_limit")]
    pub context_text_limit: usize,

    /// Pause after each translated element.
    #[serde(default = "default_translate_delay_ms")]
    pub translate_delay_ms: u64,

    /// Pause between flagging an element and clicking it.
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            max_tokens: default_max_tokens(),
            history_window: default_history_window(),
            context_text_limit: default_context_text_limit(),
            translate_delay_ms: default_translate_delay_ms(),
            click_delay_ms: default_click_delay_ms(),
        }
    }
}

fn default_target_language() -> String {
    "English".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_history_window() -> usize {
    5
}

fn default_context_text_limit() -> usize {
    3000
}

fn default_translate_delay_ms() -> u64 {
    100
}

fn default_click_delay_ms() -> u64 {
    1000
}

/// Persistent store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend type (sqlite, memory).
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// Database path for the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

fn default_storage_backend() -> String {
    "sqlite".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root directory for PagePilot state (`~/.pagepilot`).
pub fn pagepilot_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pagepilot"))
        .unwrap_or_else(|| PathBuf::from(".pagepilot"))
}

impl StorageConfig {
    /// Database path, falling back to `~/.pagepilot/store.db`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| pagepilot_dir().join("store.db"))
    }
}

impl LoggingConfig {
    /// Log directory, falling back to `~/.pagepilot/logs`.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| pagepilot_dir().join("logs"))
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
