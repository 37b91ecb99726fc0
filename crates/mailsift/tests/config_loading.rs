//! Configuration loading integration tests.
//!
//! Tests the config loading APIs:
//! - from_file() with TOML/YAML/JSON
//! - discover() for searching parent directories
//! - Error handling for invalid configs

use mailsift::{MailsiftConfig, MailsiftError, Orchestrator};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_from_file_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mailsift.toml");
    fs::write(
        &path,
        r#"
log_level = "debug"

[validation]
enable_dns_lookup = true
dns_timeout_secs = 2
domain_blacklist = ["spam.biz"]

[ocr]
language = "deu"
render_dpi = 200
"#,
    )
    .unwrap();

    let config = MailsiftConfig::from_file(&path).unwrap();
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert!(config.validation.enable_dns_lookup);
    assert_eq!(config.validation.dns_timeout_secs, 2);
    assert_eq!(config.validation.domain_blacklist, vec!["spam.biz"]);
    assert_eq!(config.ocr.language, "deu");
    assert_eq!(config.ocr.render_dpi, 200);

    // Omitted keys keep their defaults.
    assert_eq!(config.validation.mx_cache_capacity, 1000);
    assert!(config.validation.known_valid_domains.contains(&"gmail.com".to_string()));
    assert_eq!(config.extraction.min_content_weight, 50);
}

#[test]
fn test_from_file_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mailsift.yaml");
    fs::write(
        &path,
        r#"
ocr:
  enabled: false
extraction:
  min_content_weight: 120
"#,
    )
    .unwrap();

    let config = MailsiftConfig::from_file(&path).unwrap();
    assert!(!config.ocr.enabled);
    assert_eq!(config.extraction.min_content_weight, 120);
}

#[test]
fn test_from_file_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mailsift.json");
    fs::write(&path, r#"{"validation": {"email_blacklist": []}}"#).unwrap();

    let config = MailsiftConfig::from_file(&path).unwrap();
    assert!(config.validation.email_blacklist.is_empty());
    assert!(!config.validation.domain_blacklist.is_empty());
}

#[test]
fn test_invalid_and_unsupported_files() {
    let temp_dir = TempDir::new().unwrap();

    let broken = temp_dir.path().join("broken.toml");
    fs::write(&broken, "[validation\nenable_dns_lookup = true").unwrap();
    assert!(matches!(
        MailsiftConfig::from_file(&broken),
        Err(MailsiftError::Validation { .. })
    ));

    let broken_json = temp_dir.path().join("broken.json");
    fs::write(&broken_json, "{\"validation\": ").unwrap();
    let err = MailsiftConfig::from_file(&broken_json).unwrap_err();
    assert!(matches!(err, MailsiftError::Validation { .. }));
    assert!(err.is_input_error());

    let ini = temp_dir.path().join("mailsift.ini");
    fs::write(&ini, "x=1").unwrap();
    let err = MailsiftConfig::from_file(&ini).unwrap_err();
    assert!(err.to_string().contains("Unsupported config format"));

    let missing = temp_dir.path().join("absent.toml");
    assert!(MailsiftConfig::from_file(&missing).is_err());
}

#[test]
fn test_validate_rejects_unusable_values() {
    let mut config = MailsiftConfig::default();
    config.ocr.language = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = MailsiftConfig::default();
    config.validation.mx_cache_capacity = 0;
    assert!(config.validate().is_err());
    assert!(Orchestrator::new(&config).is_err());

    let mut config = MailsiftConfig::default();
    config.validation.dns_timeout_secs = 0;
    assert!(config.validate().is_err());

    assert!(MailsiftConfig::default().validate().is_ok());
}

#[test]
#[serial]
fn test_discover_walks_up_from_current_dir() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("reports").join("2024");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        temp_dir.path().join(".mailsift.toml"),
        "[extraction]\nmin_content_weight = 75\n",
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(&nested).unwrap();
    let discovered = MailsiftConfig::discover();
    std::env::set_current_dir(original).unwrap();

    let config = discovered.unwrap().expect("config should be discovered in a parent directory");
    assert_eq!(config.extraction.min_content_weight, 75);
}
