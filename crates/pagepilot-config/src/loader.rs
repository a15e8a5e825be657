//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a TOML file, or the defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load(path)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        config.storage.path = config.storage.path.map(|p| Self::expand_path_buf(&p));
        config.logging.dir = config.logging.dir.map(|p| Self::expand_path_buf(&p));
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "env".to_string(),
            message: e.to_string(),
        })?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.pagepilot`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }

    fn expand_path_buf(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => PathBuf::from(Self::expand_path(s)),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.assistant.target_language, "English");
        assert_eq!(config.storage.backend, "sqlite");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [assistant]
            target_language = "English"
            max_tokens = 800
            history_window = 3
            context_text_limit = 1500
            translate_delay_ms = 50
            click_delay_ms = 250

            [storage]
            backend = "memory"

            [logging]
            level = "debug"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.assistant.max_tokens, 800);
        assert_eq!(config.assistant.history_window, 3);
        assert_eq!(config.assistant.context_text_limit, 1500);
        assert_eq!(config.assistant.translate_delay_ms, 50);
        assert_eq!(config.assistant.click_delay_ms, 250);
        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[assistant]").unwrap();
        writeln!(file, "max_tokens = 42").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.assistant.max_tokens, 42);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let err = ConfigLoader::load(Path::new("/nonexistent/path/pagepilot.toml")).unwrap_err();
        match err {
            ConfigError::NotFound(path) => assert!(path.ends_with("pagepilot.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/pagepilot.toml")).unwrap();
        assert_eq!(config.assistant.max_tokens, 500);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PAGEPILOT_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${PAGEPILOT_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("test_value"));
        unsafe {
            std::env::remove_var("PAGEPILOT_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_PAGEPILOT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_storage_path_tilde_is_expanded() {
        let content = r#"
            [storage]
            path = "~/pagepilot-test.db"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        let path = config.storage.path.unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("pagepilot-test.db"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }
}
