/*!
 * Error types for the konjugator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Error raised when a stored or user-supplied string does not name a
/// member of one of the closed grammar vocabularies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} '{value}'. Allowed: {allowed:?}")]
pub struct UnknownValueError {
    /// Vocabulary name (e.g. "tense", "pronoun")
    pub kind: &'static str,
    /// The rejected value
    pub value: String,
    /// Accepted spellings
    pub allowed: Vec<&'static str>,
}

/// Errors that can occur when resolving a conjugated form
#[derive(Error, Debug)]
pub enum ConjugationError {
    /// A simple-tense form is missing from the store
    #[error("Missing form for {infinitive} {tense} {pronoun}")]
    NotFound {
        /// Verb infinitive
        infinitive: String,
        /// Tense name
        tense: String,
        /// Pronoun text
        pronoun: String,
    },

    /// The verb lacks data required for the requested tense
    #[error("Verb {infinitive} has no {missing} defined")]
    InvalidState {
        /// Verb infinitive
        infinitive: String,
        /// Name of the missing attribute
        missing: &'static str,
    },

    /// The caller passed a tense the resolver does not know
    #[error("Unsupported tense: {0}")]
    UnsupportedTense(String),

    /// Error from the underlying store
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Errors that can occur when tracking learner progress
#[derive(Error, Debug)]
pub enum ProgressError {
    /// The progress key is inconsistent (pronoun given for a skill that has
    /// none, or missing for one that needs it)
    #[error("Invalid progress key: {0}")]
    InvalidKey(String),

    /// The record was not found when persisting an update
    #[error("Progress record {0} does not exist")]
    MissingRecord(i64),

    /// Error from the underlying store
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Errors that can occur during a bulk import
#[derive(Error, Debug)]
pub enum ImportError {
    /// The payload could not be read
    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not a `{"verbs": [...]}` document
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// An item references an unknown value or carries an empty field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from the underlying store
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<UnknownValueError> for ImportError {
    fn from(error: UnknownValueError) -> Self {
        Self::Validation(error.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store(error.into())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No verb with this infinitive
    #[error("Verb not found: {0}")]
    VerbNotFound(String),

    /// No learning unit with this ID
    #[error("Learning unit {0} not found")]
    UnitNotFound(i64),

    /// The verb has no translation in this language
    #[error("No '{language}' translation for {infinitive}")]
    TranslationNotFound { infinitive: String, language: String },

    /// Rejected user input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Error from conjugation
    #[error("Conjugation error: {0}")]
    Conjugation(#[from] ConjugationError),

    /// Error from progress tracking
    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),

    /// Error from a bulk import
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
