use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::importer::{ImportOptions, ImportPolicy};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// SQLite database file; the per-user data directory when unset
    #[serde(default)]
    pub database_path: Option<String>,

    /// Language shown next to verbs (ISO code)
    #[serde(default = "default_translation_language")]
    pub translation_language: String,

    /// Learner used when a command does not name one
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Import defaults
    #[serde(default)]
    pub import: ImportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Bulk import defaults, overridable per invocation
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ImportConfig {
    /// Overwrite existing values instead of filling gaps
    #[serde(default)]
    pub force: bool,

    /// Log every skipped value
    #[serde(default)]
    pub debug: bool,
}

impl ImportConfig {
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            policy: if self.force {
                ImportPolicy::Force
            } else {
                ImportPolicy::FillIfAbsent
            },
            debug: self.debug,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_translation_language() -> String {
    "en".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

impl Config {
    /// Load the configuration at `path`, writing a default one first if the
    /// file does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.translation_language)
            .with_context(|| format!("Invalid translation language: {}", self.translation_language))?;

        if self.default_user.trim().is_empty() {
            return Err(anyhow!("Default user must not be empty"));
        }

        if let Some(path) = &self.database_path {
            if path.trim().is_empty() {
                return Err(anyhow!("Database path must not be empty when set"));
            }
        }

        Ok(())
    }

    /// Resolved database location
    pub fn database_file(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => crate::database::DatabaseConnection::default_database_path(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            translation_language: default_translation_language(),
            default_user: default_user(),
            import: ImportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
