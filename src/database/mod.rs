/*!
 * Database module for persistent storage of the verb catalogue and
 * learner progress.
 *
 * This module provides SQLite-based persistence for:
 * - Verbs with their stored forms, translations and prepositions
 * - Learning units sequencing verbs into lessons
 * - Per-user progress records
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{
    LearningUnitRecord, PrepositionRecord, ProgressKey, ProgressRecord, TranslationRecord,
    VerbFormRecord, VerbPrepositionRecord, VerbRecord,
};
pub use repository::{Repository, SkillSummary};
