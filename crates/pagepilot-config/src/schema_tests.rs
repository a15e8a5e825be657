use super::*;

#[test]
fn test_assistant_defaults() {
    let config = AssistantConfig::default();
    assert_eq!(config.target_language, "English");
    assert_eq!(config.max_tokens, 500);
    assert_eq!(config.history_window, 5);
    assert_eq!(config.context_text_limit, 3000);
    assert_eq!(config.translate_delay_ms, 100);
    assert_eq!(config.click_delay_ms, 1000);
}

#[test]
fn test_storage_defaults() {
    let config = StorageConfig::default();
    assert_eq!(config.backend, "sqlite");
    assert!(config.path.is_none());
    assert!(config.resolved_path().ends_with("store.db"));
}

#[test]
fn test_storage_explicit_path() {
    let config = StorageConfig {
        backend: "sqlite".to_string(),
        path: Some(PathBuf::from("/tmp/pp.db")),
    };
    assert_eq!(config.resolved_path(), PathBuf::from("/tmp/pp.db"));
}

#[test]
fn test_logging_defaults() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert!(config.resolved_dir().ends_with("logs"));
}

#[test]
fn test_partial_assistant_section() {
    let config: Config = toml::from_str(
        r#"
        [assistant]
        click_delay_ms = 10
        "#,
    )
    .unwrap();
    assert_eq!(config.assistant.click_delay_ms, 10);
    assert_eq!(config.assistant.translate_delay_ms, 100);
    assert_eq!(config.storage.backend, "sqlite");
}
