//! Runtime assistant settings.

use std::time::Duration;

use pagepilot_config::AssistantConfig;

/// Assistant settings resolved from [`AssistantConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target_language: String,
    pub max_tokens: u32,
    pub history_window: usize,
    pub context_text_limit: usize,
    pub translate_delay: Duration,
    pub click_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&AssistantConfig::default())
    }
}

impl From<&AssistantConfig> for Settings {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            target_language: config.target_language.clone(),
            max_tokens: config.max_tokens,
            history_window: config.history_window,
            context_text_limit: config.context_text_limit,
            translate_delay: Duration::from_millis(config.translate_delay_ms),
            click_delay: Duration::from_millis(config.click_delay_ms),
        }
    }
}
