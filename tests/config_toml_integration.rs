use bastion_sessions::config::BastionConfig;
use bastion_sessions::i18n::Language;
use bastion_sessions::service::RetryPolicy;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization_roundtrip() {
    let original_config = BastionConfig::default();

    let toml_str = original_config
        .to_toml_string()
        .expect("Should be able to serialize config to TOML");

    assert!(toml_str.contains("core_host"), "Should contain core_host field");
    assert!(toml_str.contains("[retry]"), "Should contain retry table");
    assert!(!toml_str.contains("access_token"), "Unset token should be omitted");

    let deserialized_config =
        BastionConfig::from_toml_str(&toml_str).expect("Should be able to deserialize TOML string");
    assert_eq!(original_config, deserialized_config);
}

#[test]
fn test_config_file_operations() {
    let temp_file = NamedTempFile::new().expect("Should be able to create temporary file");
    let temp_path = temp_file.path();

    std::fs::write(
        temp_path,
        r#"
core_host = "https://core.internal:8443"
access_token = "abc123"
language = "zh"
heartbeat_interval_secs = 15
compensate_on_policy_failure = false

[retry]
max_attempts = 3
interval_ms = 100
"#,
    )
    .expect("Should be able to write config file");

    let config = BastionConfig::from_toml_file(temp_path).expect("Should load config file");

    assert_eq!(config.core_host, "https://core.internal:8443");
    assert_eq!(config.access_token.as_deref(), Some("abc123"));
    assert_eq!(config.language, Language::Zh);
    assert_eq!(config.heartbeat_interval(), Duration::from_secs(15));
    assert_eq!(
        config.retry_policy(),
        RetryPolicy::new(3, Duration::from_millis(100))
    );
    assert!(!config.session_manager_config().compensate_on_policy_failure);

    let client = config.control_plane().expect("Should build core server client");
    assert_eq!(client.base_url().as_str(), "https://core.internal:8443/");
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(BastionConfig::from_toml_str("core_host = \"\"").is_err());
    assert!(BastionConfig::from_toml_str("heartbeat_interval_secs = 0").is_err());
    assert!(BastionConfig::from_toml_str("retry = 5").is_err());
}

#[test]
fn test_missing_file_reports_path() {
    let error = BastionConfig::from_toml_file("/nonexistent/bastion.toml").unwrap_err();
    assert!(format!("{:#}", error).contains("/nonexistent/bastion.toml"));
}
