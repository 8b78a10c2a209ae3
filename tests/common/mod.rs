/*!
 * Common test utilities for the konjugator test suite
 */

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

use konjugator::Controller;
use konjugator::app_config::Config;

static INIT_LOGGER: Once = Once::new();

/// Route library logs through env_logger once per test binary
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Payload with two fully described verbs
pub fn sample_payload() -> Value {
    json!({
        "verbs": [
            {
                "infinitive": "machen",
                "verb_type": "schwach",
                "level": "A1",
                "is_trennbare": false,
                "case": "AKK",
                "perfekt": {"auxiliary": "haben", "participle_ii": "gemacht"},
                "forms": {
                    "Präsens": {
                        "ich": "mache", "du": "machst", "er/sie/es": "macht",
                        "wir": "machen", "ihr": "macht", "sie": "machen"
                    },
                    "Präteritum": {
                        "ich": "machte", "du": "machtest", "er/sie/es": "machte",
                        "wir": "machten", "ihr": "machtet", "sie": "machten"
                    }
                },
                "translations": {"en": "to make", "ru": "делать"}
            },
            {
                "infinitive": "gehen",
                "verb_type": "stark",
                "level": "A1",
                "perfekt": {"auxiliary": "sein", "participle_ii": "gegangen"},
                "forms": {
                    "Präsens": {"ich": "gehe", "du": "gehst", "er/sie/es": "geht"},
                    "Präteritum": {"ich": "ging", "du": "gingst"}
                },
                "translations": {"en": "to go"}
            }
        ]
    })
}

/// Writes the payload as JSON into `dir`
pub fn write_payload(dir: &Path, filename: &str, payload: &Value) -> Result<PathBuf> {
    create_test_file(dir, filename, &serde_json::to_string_pretty(payload)?)
}

/// Controller backed by a database file inside `dir`
pub fn controller_in(dir: &Path) -> Result<Controller> {
    let config = Config {
        database_path: Some(dir.join("konjugator.db").to_string_lossy().into_owned()),
        ..Config::default()
    };
    Controller::with_config(config)
}
