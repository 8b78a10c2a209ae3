/*!
 * Database schema definitions.
 *
 * This module contains the SQL schema for the verb catalogue and the
 * learner progress tables, and bootstraps it on a fresh database.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Foreign keys are a per-connection setting in SQLite
    conn.pragma_update(None, "foreign_keys", "ON")
        .context("Failed to enable foreign keys")?;

    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version == SCHEMA_VERSION {
        debug!("Database schema is up to date (v{})", current_version);
    } else {
        return Err(anyhow!(
            "Unsupported schema version v{} (this build expects v{})",
            current_version,
            SCHEMA_VERSION
        ));
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL is ignored for in-memory databases
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Verb catalogue
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS verbs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            infinitive TEXT NOT NULL UNIQUE,
            verb_type TEXT NOT NULL DEFAULT 'schwach'
                CHECK (verb_type IN ('schwach', 'stark', 'gemischt')),
            level TEXT NOT NULL DEFAULT 'A1' CHECK (level IN ('A1', 'A2', 'B1', 'B2', 'C1', 'C2')),
            reflexivity TEXT NOT NULL DEFAULT 'nicht reflexiv'
                CHECK (reflexivity IN ('nicht reflexiv', 'reflexiv', 'teilreflexiv')),
            is_separable INTEGER NOT NULL DEFAULT 0 CHECK (is_separable IN (0, 1)),
            governed_case TEXT CHECK (governed_case IN ('AKK', 'DAT')),
            auxiliary TEXT CHECK (auxiliary IN ('haben', 'sein')),
            participle_ii TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_verbs_level ON verbs(level);

        CREATE TABLE IF NOT EXISTS verb_forms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            verb_id INTEGER NOT NULL REFERENCES verbs(id) ON DELETE CASCADE,
            tense TEXT NOT NULL CHECK (tense IN ('Präsens', 'Präteritum')),
            pronoun TEXT NOT NULL CHECK (pronoun IN ('ich', 'du', 'er/sie/es', 'wir', 'ihr', 'sie')),
            form TEXT NOT NULL,
            UNIQUE(verb_id, tense, pronoun)
        );

        CREATE TABLE IF NOT EXISTS verb_translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            verb_id INTEGER NOT NULL REFERENCES verbs(id) ON DELETE CASCADE,
            language_code TEXT NOT NULL,
            translation TEXT NOT NULL,
            UNIQUE(verb_id, language_code)
        );
        "#,
    )?;

    // Prepositions governed by verbs
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS prepositions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL UNIQUE,
            case_requirement TEXT NOT NULL CHECK (case_requirement IN ('AKK', 'DAT', 'GEN', 'MIXED'))
        );

        CREATE TABLE IF NOT EXISTS verb_prepositions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            verb_id INTEGER NOT NULL REFERENCES verbs(id) ON DELETE CASCADE,
            preposition_id INTEGER NOT NULL REFERENCES prepositions(id) ON DELETE CASCADE,
            governed_case TEXT CHECK (governed_case IN ('AKK', 'DAT'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_verb_prepositions_key
            ON verb_prepositions(verb_id, preposition_id, IFNULL(governed_case, ''));
        "#,
    )?;

    // Lesson sequencing
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS learning_units (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            level TEXT NOT NULL CHECK (level IN ('A1', 'A2', 'B1', 'B2', 'C1', 'C2')),
            tense TEXT NOT NULL CHECK (tense IN ('Präsens', 'Präteritum', 'Perfekt')),
            sort_order INTEGER NOT NULL CHECK (sort_order >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_learning_units_order ON learning_units(sort_order);

        CREATE TABLE IF NOT EXISTS learning_unit_verbs (
            unit_id INTEGER NOT NULL REFERENCES learning_units(id) ON DELETE CASCADE,
            verb_id INTEGER NOT NULL REFERENCES verbs(id) ON DELETE CASCADE,
            PRIMARY KEY (unit_id, verb_id)
        );
        "#,
    )?;

    // Learner progress. An absent pronoun is a single value for uniqueness,
    // hence the IFNULL expression in the unique index.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS user_verb_progress (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            verb_id INTEGER NOT NULL REFERENCES verbs(id) ON DELETE CASCADE,
            skill_type TEXT NOT NULL
                CHECK (skill_type IN ('translation', 'praesens', 'praeteritum', 'perfekt')),
            pronoun TEXT CHECK (pronoun IN ('ich', 'du', 'er/sie/es', 'wir', 'ihr', 'sie')),
            correct_count INTEGER NOT NULL DEFAULT 0 CHECK (correct_count >= 0),
            wrong_count INTEGER NOT NULL DEFAULT 0 CHECK (wrong_count >= 0),
            streak INTEGER NOT NULL DEFAULT 0 CHECK (streak >= 0),
            mastered INTEGER NOT NULL DEFAULT 0 CHECK (mastered IN (0, 1)),
            last_answer_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK ((skill_type = 'translation') = (pronoun IS NULL))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_progress_key
            ON user_verb_progress(user_id, verb_id, skill_type, IFNULL(pronoun, ''));
        CREATE INDEX IF NOT EXISTS idx_progress_user_skill ON user_verb_progress(user_id, skill_type);
        CREATE INDEX IF NOT EXISTS idx_progress_user_mastered ON user_verb_progress(user_id, mastered);
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}
