/*!
 * # konjugator - German verb conjugation trainer
 *
 * A Rust library for storing German verbs, resolving their conjugations and
 * tracking a learner's progress through practice exercises.
 *
 * ## Features
 *
 * - Stored Präsens and Präteritum forms, Perfekt composed from the
 *   auxiliary (haben/sein) and the past participle
 * - Per-learner progress with streaks and mastery
 * - Bulk import of verbs from JSON with fill-if-absent or force policies
 * - Learning units and verb prepositions
 * - ISO 639-1 and ISO 639-2 language code support for translations
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `grammar`: Closed vocabularies (tense, pronoun, case...) and the auxiliary table
 * - `conjugation`: Resolution of (verb, tense, pronoun) to a surface form
 * - `progress`: Streak and mastery tracking
 * - `database`: SQLite persistence:
 *   - `database::connection`: Connection wrapper and transactions
 *   - `database::schema`: Versioned schema bootstrap
 *   - `database::models`: Entity records
 *   - `database::repository`: Queries over every entity
 * - `importer`: JSON payload import
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod conjugation;
pub mod database;
pub mod errors;
pub mod grammar;
pub mod importer;
pub mod language_utils;
pub mod progress;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use conjugation::{ConjugationResolver, FormSource};
pub use database::Repository;
pub use errors::{AppError, ConjugationError, ImportError, ProgressError, UnknownValueError};
pub use grammar::{AuxiliaryVerb, Pronoun, SkillType, Tense};
pub use importer::{ImportPolicy, ImportReport, VerbImporter};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use progress::{ProgressTracker, STREAK_TO_MASTER};
