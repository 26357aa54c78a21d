use photo_search_common::config::SystemConfig;
use photo_search_common::types::MatchMode;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        "test_config.toml",
        r#"
[opensearch]
host = "search-photos.us-east-1.es.amazonaws.com"
username = "admin"
password = "secret"

[lex]
bot_id = "BOT123"
bot_alias_id = "ALIAS456"

[search]
match_mode = "term"
max_results = 25

[ingestion]
max_concurrent_records = 4
"#,
    );

    let config = SystemConfig::from_file(&config_path).unwrap();

    assert_eq!(config.opensearch.host, "search-photos.us-east-1.es.amazonaws.com");
    assert_eq!(config.opensearch.port, 443);
    assert_eq!(config.opensearch.index_name, "photos");
    assert_eq!(config.lex.locale_id, "en_US");
    assert_eq!(config.lex.session_id, "test-session");
    assert_eq!(config.search.match_mode, MatchMode::Term);
    assert_eq!(config.search.max_results, 25);
    assert_eq!(config.search.link_expiry_secs, 3600);
    assert_eq!(config.ingestion.max_concurrent_records, 4);
    assert_eq!(config.ingestion.max_labels, 10);
    assert_eq!(config.lex_bot().unwrap(), ("BOT123", "ALIAS456"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_overrides_win_over_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        "override.toml",
        r#"
[opensearch]
host = "file-host"
port = 9200
"#,
    );

    let env: HashMap<&str, &str> = [
        ("OPENSEARCH_HOST", "env-host"),
        ("OPENSEARCH_USER", "env-user"),
        ("OPENSEARCH_PASS", "env-pass"),
        ("BOT_ID", "B1"),
        ("BOT_ALIAS_ID", "A1"),
        ("AWS_REGION", "eu-west-1"),
        ("OPENSEARCH_PORT", "   "),
    ]
    .into_iter()
    .collect();

    let mut config = SystemConfig::from_file(&config_path).unwrap();
    config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.opensearch.host, "env-host");
    assert_eq!(config.opensearch.port, 9200, "blank override is ignored");
    assert_eq!(config.opensearch.username.as_deref(), Some("env-user"));
    assert_eq!(config.opensearch.password.as_deref(), Some("env-pass"));
    assert_eq!(config.aws.region, "eu-west-1");
    assert_eq!(config.lex_bot().unwrap(), ("B1", "A1"));
}

#[test]
fn test_config_validation_missing_host() {
    let config = SystemConfig::default();

    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("opensearch.host"));
}

#[test]
fn test_config_validation_invalid_confidence() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        "invalid_confidence.toml",
        r#"
[opensearch]
host = "localhost"

[ingestion]
min_confidence = 140.0
"#,
    );

    let config = SystemConfig::from_file(&config_path).unwrap();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("min_confidence"));
}

#[test]
fn test_config_validation_link_expiry_bounds() {
    let mut config = SystemConfig::default();
    config.opensearch.host = "localhost".to_string();

    config.search.link_expiry_secs = 0;
    assert!(config.validate().is_err());

    config.search.link_expiry_secs = 700_000;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("link_expiry_secs"));

    config.search.link_expiry_secs = 3600;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_unknown_match_mode() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        "bad_mode.toml",
        r#"
[search]
match_mode = "fuzzy"
"#,
    );

    let result = SystemConfig::from_file(&config_path);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to parse"));
}

#[test]
fn test_lex_bot_required_for_search() {
    let config = SystemConfig::default();
    let err = config.lex_bot().unwrap_err();
    assert!(err.to_string().contains("BOT_ID"));
}

#[test]
fn test_base_url_follows_ssl_flag() {
    let mut config = SystemConfig::default();
    config.opensearch.host = "localhost".to_string();
    assert_eq!(config.opensearch.base_url(), "https://localhost:443");

    config.opensearch.use_ssl = false;
    config.opensearch.port = 9200;
    assert_eq!(config.opensearch.base_url(), "http://localhost:9200");
}
