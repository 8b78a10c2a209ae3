/*!
 * Tests for application configuration functionality
 */

use konjugator::app_config::{Config, LogLevel};
use konjugator::importer::ImportPolicy;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.database_path, None);
    assert_eq!(config.translation_language, "en");
    assert_eq!(config.default_user, "default");
    assert!(!config.import.force);
    assert!(!config.import.debug);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.translation_language = "rus".to_string();
    assert!(config.validate().is_ok());

    config.translation_language = "xyz".to_string();
    assert!(config.validate().is_err());

    config = Config::default();
    config.default_user = "  ".to_string();
    assert!(config.validate().is_err());

    config = Config::default();
    config.database_path = Some(String::new());
    assert!(config.validate().is_err());
}

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load_or_create(&path).unwrap(), config);
}

/// Test loading a partial config file
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"log_level": "debug", "import": {"force": true, "debug": true}}"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation_language, "en");
    let options = config.import.options();
    assert_eq!(options.policy, ImportPolicy::Force);
    assert!(options.debug);
}

/// Test that an unparsable config file is reported
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json").unwrap();

    let result = Config::load_or_create(&path);

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse config file"));
}

/// Test serialization round trip with a database path
#[test]
fn test_save_withDatabasePath_shouldPersist() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");
    let config = Config {
        database_path: Some("/tmp/verbs.db".to_string()),
        translation_language: "ru".to_string(),
        ..Config::default()
    };

    config.save(&path).unwrap();

    assert_eq!(Config::load_or_create(&path).unwrap(), config);
    assert_eq!(config.database_file().unwrap().to_string_lossy(), "/tmp/verbs.db");
}
