//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Longest pause that does not trigger a warning.
const MAX_QUIET_DELAY_MS: u64 = 10_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_assistant(config, &mut result);
        Self::validate_storage(config, &mut result);

        result
    }

    fn validate_assistant(config: &Config, result: &mut ValidationResult) {
        let assistant = &config.assistant;

        if assistant.target_language.trim().is_empty() {
            result.add_error(ValidationError::new(
                "assistant.target_language",
                "target_language cannot be empty",
            ));
        }

        if assistant.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "assistant.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if assistant.history_window == 0 {
            result.add_error(ValidationError::new(
                "assistant.history_window",
                "history_window must be greater than 0",
            ));
        }

        if assistant.context_text_limit == 0 {
            result.add_error(ValidationError::new(
                "assistant.context_text_limit",
                "context_text_limit must be greater than 0",
            ));
        }

        for (path, value) in [
            ("assistant.translate_delay_ms", assistant.translate_delay_ms),
            ("assistant.click_delay_ms", assistant.click_delay_ms),
        ] {
            if value > MAX_QUIET_DELAY_MS {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!("delay of {}ms is very long", value),
                ));
            }
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        let valid_backends = ["sqlite", "memory"];
        if !valid_backends.contains(&config.storage.backend.as_str()) {
            result.add_error(ValidationError::new(
                "storage.backend",
                format!(
                    "Unknown storage backend '{}', valid values: {:?}",
                    config.storage.backend, valid_backends
                ),
            ));
        }

        if config.storage.backend == "memory" && config.storage.path.is_some() {
            result.add_warning(ValidationWarning::new(
                "storage.path",
                "path is ignored by the memory backend",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
