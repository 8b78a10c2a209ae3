/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 *
 * Functions taking a `&Connection` run on whatever connection or open
 * transaction the caller holds; the `&self` methods acquire the shared
 * connection for a single operation.
 */

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::DatabaseConnection;
use super::models::{
    LearningUnitRecord, PrepositionRecord, ProgressKey, ProgressRecord, TranslationRecord,
    VerbFormRecord, VerbPrepositionRecord, VerbRecord,
};
use crate::grammar::{CefrLevel, GermanCase, PrepositionCase, Pronoun, SkillType, Tense};

/// Mastery counts for one skill of one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillSummary {
    pub skill_type: SkillType,
    /// Number of progress records
    pub tracked: u32,
    /// Number of mastered progress records
    pub mastered: u32,
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Get the underlying connection wrapper
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Verb Operations
    // =========================================================================

    /// Insert a new verb and return its ID
    pub fn insert_verb(&self, verb: &VerbRecord) -> Result<i64> {
        self.db.execute(|conn| Self::insert_verb_row(conn, verb))
    }

    pub(crate) fn insert_verb_row(conn: &Connection, verb: &VerbRecord) -> Result<i64> {
        conn.execute(
            r#"
            INSERT INTO verbs (
                infinitive, verb_type, level, reflexivity, is_separable,
                governed_case, auxiliary, participle_ii
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                verb.infinitive,
                verb.verb_type.as_str(),
                verb.level.as_str(),
                verb.reflexivity.as_str(),
                verb.is_separable,
                verb.governed_case.map(|c| c.code()),
                verb.auxiliary.map(|a| a.as_str()),
                verb.participle_ii,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted verb '{}' with id {}", verb.infinitive, id);
        Ok(id)
    }

    /// Overwrite every attribute of an existing verb
    pub(crate) fn update_verb_row(conn: &Connection, verb: &VerbRecord) -> Result<()> {
        conn.execute(
            r#"
            UPDATE verbs
            SET infinitive = ?1, verb_type = ?2, level = ?3, reflexivity = ?4,
                is_separable = ?5, governed_case = ?6, auxiliary = ?7, participle_ii = ?8
            WHERE id = ?9
            "#,
            params![
                verb.infinitive,
                verb.verb_type.as_str(),
                verb.level.as_str(),
                verb.reflexivity.as_str(),
                verb.is_separable,
                verb.governed_case.map(|c| c.code()),
                verb.auxiliary.map(|a| a.as_str()),
                verb.participle_ii,
                verb.id,
            ],
        )?;
        Ok(())
    }

    /// Get a verb by ID
    pub fn get_verb(&self, verb_id: i64) -> Result<Option<VerbRecord>> {
        self.db.execute(|conn| {
            let verb = conn
                .query_row(
                    &format!("SELECT {} FROM verbs WHERE id = ?1", VerbRecord::COLUMNS),
                    [verb_id],
                    VerbRecord::from_row,
                )
                .optional()?;
            Ok(verb)
        })
    }

    /// Get a verb by its infinitive
    pub fn get_verb_by_infinitive(&self, infinitive: &str) -> Result<Option<VerbRecord>> {
        self.db
            .execute(|conn| Self::fetch_verb_by_infinitive(conn, infinitive))
    }

    pub(crate) fn fetch_verb_by_infinitive(
        conn: &Connection,
        infinitive: &str,
    ) -> Result<Option<VerbRecord>> {
        let verb = conn
            .query_row(
                &format!("SELECT {} FROM verbs WHERE infinitive = ?1", VerbRecord::COLUMNS),
                [infinitive],
                VerbRecord::from_row,
            )
            .optional()?;
        Ok(verb)
    }

    /// List verbs alphabetically, optionally restricted to one level
    pub fn list_verbs(&self, level: Option<CefrLevel>) -> Result<Vec<VerbRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM verbs WHERE ?1 IS NULL OR level = ?1 ORDER BY infinitive",
                VerbRecord::COLUMNS
            ))?;
            let verbs = stmt
                .query_map([level.map(|l| l.as_str())], VerbRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(verbs)
        })
    }

    /// Delete a verb and everything that references it
    pub fn delete_verb(&self, verb_id: i64) -> Result<bool> {
        self.db.execute(|conn| {
            // Due to CASCADE, forms, translations, links and progress go too
            let deleted = conn.execute("DELETE FROM verbs WHERE id = ?1", [verb_id])?;
            Ok(deleted > 0)
        })
    }

    // =========================================================================
    // Form Operations
    // =========================================================================

    /// Store a simple-tense form, replacing any previous one
    pub fn upsert_form(&self, verb_id: i64, tense: Tense, pronoun: Pronoun, form: &str) -> Result<()> {
        self.db
            .execute(|conn| Self::write_form(conn, verb_id, tense, pronoun, form))
    }

    pub(crate) fn write_form(
        conn: &Connection,
        verb_id: i64,
        tense: Tense,
        pronoun: Pronoun,
        form: &str,
    ) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO verb_forms (verb_id, tense, pronoun, form)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(verb_id, tense, pronoun) DO UPDATE SET form = excluded.form
            "#,
            params![verb_id, tense.as_str(), pronoun.as_str(), form],
        )?;
        Ok(())
    }

    /// Get the stored form for (verb, tense, pronoun)
    pub fn get_form(&self, verb_id: i64, tense: Tense, pronoun: Pronoun) -> Result<Option<String>> {
        self.db
            .execute(|conn| Self::fetch_form(conn, verb_id, tense, pronoun))
    }

    pub(crate) fn fetch_form(
        conn: &Connection,
        verb_id: i64,
        tense: Tense,
        pronoun: Pronoun,
    ) -> Result<Option<String>> {
        let form = conn
            .query_row(
                "SELECT form FROM verb_forms WHERE verb_id = ?1 AND tense = ?2 AND pronoun = ?3",
                params![verb_id, tense.as_str(), pronoun.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(form)
    }

    /// List all stored forms of a verb by tense, then pronoun order
    pub fn list_forms(&self, verb_id: i64) -> Result<Vec<VerbFormRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, verb_id, tense, pronoun, form FROM verb_forms WHERE verb_id = ?1",
            )?;
            let mut forms = stmt
                .query_map([verb_id], VerbFormRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            forms.sort_by_key(|f| (f.tense, f.pronoun));
            Ok(forms)
        })
    }

    // =========================================================================
    // Translation Operations
    // =========================================================================

    /// Store a translation, replacing any previous one for the language
    pub fn upsert_translation(&self, verb_id: i64, language_code: &str, translation: &str) -> Result<()> {
        self.db
            .execute(|conn| Self::write_translation(conn, verb_id, language_code, translation))
    }

    pub(crate) fn write_translation(
        conn: &Connection,
        verb_id: i64,
        language_code: &str,
        translation: &str,
    ) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO verb_translations (verb_id, language_code, translation)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(verb_id, language_code) DO UPDATE SET translation = excluded.translation
            "#,
            params![verb_id, language_code, translation],
        )?;
        Ok(())
    }

    /// Get the translation of a verb into a language
    pub fn get_translation(&self, verb_id: i64, language_code: &str) -> Result<Option<String>> {
        self.db
            .execute(|conn| Self::fetch_translation(conn, verb_id, language_code))
    }

    pub(crate) fn fetch_translation(
        conn: &Connection,
        verb_id: i64,
        language_code: &str,
    ) -> Result<Option<String>> {
        let translation = conn
            .query_row(
                "SELECT translation FROM verb_translations WHERE verb_id = ?1 AND language_code = ?2",
                params![verb_id, language_code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(translation)
    }

    /// List all translations of a verb by language code
    pub fn list_translations(&self, verb_id: i64) -> Result<Vec<TranslationRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, verb_id, language_code, translation
                FROM verb_translations WHERE verb_id = ?1
                ORDER BY language_code
                "#,
            )?;
            let translations = stmt
                .query_map([verb_id], TranslationRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(translations)
        })
    }

    // =========================================================================
    // Preposition Operations
    // =========================================================================

    /// Get a preposition by text, creating it when missing
    ///
    /// An existing preposition keeps its recorded case requirement.
    pub fn ensure_preposition(
        &self,
        text: &str,
        case_requirement: PrepositionCase,
    ) -> Result<PrepositionRecord> {
        self.db.transaction(|tx| {
            tx.execute(
                "INSERT OR IGNORE INTO prepositions (text, case_requirement) VALUES (?1, ?2)",
                params![text, case_requirement.code()],
            )?;
            let preposition = tx.query_row(
                "SELECT id, text, case_requirement FROM prepositions WHERE text = ?1",
                [text],
                PrepositionRecord::from_row,
            )?;
            Ok(preposition)
        })
    }

    /// Link a preposition to a verb; returns false if the link already existed
    pub fn link_preposition(
        &self,
        verb_id: i64,
        preposition_id: i64,
        governed_case: Option<GermanCase>,
    ) -> Result<bool> {
        self.db.execute(|conn| {
            let inserted = conn.execute(
                r#"
                INSERT OR IGNORE INTO verb_prepositions (verb_id, preposition_id, governed_case)
                VALUES (?1, ?2, ?3)
                "#,
                params![verb_id, preposition_id, governed_case.map(|c| c.code())],
            )?;
            Ok(inserted > 0)
        })
    }

    /// List prepositions governed by a verb
    pub fn list_verb_prepositions(&self, verb_id: i64) -> Result<Vec<VerbPrepositionRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT vp.id, vp.verb_id, vp.governed_case, p.id, p.text, p.case_requirement
                FROM verb_prepositions vp
                JOIN prepositions p ON p.id = vp.preposition_id
                WHERE vp.verb_id = ?1
                ORDER BY p.text, vp.governed_case
                "#,
            )?;
            let links = stmt
                .query_map([verb_id], |row| {
                    let governed_case: Option<String> = row.get(2)?;
                    let case_requirement: String = row.get(5)?;
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        governed_case,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                        case_requirement,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            links
                .into_iter()
                .map(|(id, verb_id, governed_case, prep_id, text, requirement)| {
                    Ok(VerbPrepositionRecord {
                        id,
                        verb_id,
                        preposition: PrepositionRecord {
                            id: prep_id,
                            text,
                            case_requirement: requirement.parse()?,
                        },
                        governed_case: governed_case.map(|c| c.parse()).transpose()?,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })
    }

    // =========================================================================
    // Learning Unit Operations
    // =========================================================================

    /// Create a learning unit and return its ID
    pub fn create_learning_unit(&self, unit: &LearningUnitRecord) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO learning_units (title, level, tense, sort_order) VALUES (?1, ?2, ?3, ?4)",
                params![unit.title, unit.level.as_str(), unit.tense.as_str(), unit.order],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Get a learning unit by ID
    pub fn get_learning_unit(&self, unit_id: i64) -> Result<Option<LearningUnitRecord>> {
        self.db.execute(|conn| {
            let unit = conn
                .query_row(
                    "SELECT id, title, level, tense, sort_order FROM learning_units WHERE id = ?1",
                    [unit_id],
                    LearningUnitRecord::from_row,
                )
                .optional()?;
            Ok(unit)
        })
    }

    /// List learning units in lesson order, optionally for one level
    pub fn list_learning_units(&self, level: Option<CefrLevel>) -> Result<Vec<LearningUnitRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, title, level, tense, sort_order FROM learning_units
                WHERE ?1 IS NULL OR level = ?1
                ORDER BY sort_order, id
                "#,
            )?;
            let units = stmt
                .query_map([level.map(|l| l.as_str())], LearningUnitRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(units)
        })
    }

    /// Add a verb to a unit; returns false if it was already a member
    pub fn add_verb_to_unit(&self, unit_id: i64, verb_id: i64) -> Result<bool> {
        self.db.execute(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO learning_unit_verbs (unit_id, verb_id) VALUES (?1, ?2)",
                params![unit_id, verb_id],
            )?;
            Ok(inserted > 0)
        })
    }

    /// List the verbs of a unit alphabetically
    pub fn list_unit_verbs(&self, unit_id: i64) -> Result<Vec<VerbRecord>> {
        self.db.execute(|conn| {
            let columns = VerbRecord::COLUMNS
                .split(", ")
                .map(|c| format!("v.{}", c.trim()))
                .collect::<Vec<_>>()
                .join(", ");
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {} FROM verbs v
                JOIN learning_unit_verbs luv ON luv.verb_id = v.id
                WHERE luv.unit_id = ?1
                ORDER BY v.infinitive
                "#,
                columns
            ))?;
            let verbs = stmt
                .query_map([unit_id], VerbRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(verbs)
        })
    }

    // =========================================================================
    // Progress Operations
    // =========================================================================

    /// Get the progress record for a key, creating a zeroed one when missing
    ///
    /// Returns the record and whether it was created by this call. The
    /// unique index on the key makes concurrent creators converge on one row.
    pub fn get_or_create_progress(
        &self,
        key: &ProgressKey,
        now: DateTime<Utc>,
    ) -> Result<(ProgressRecord, bool)> {
        self.db.transaction(|tx| {
            let inserted = tx.execute(
                r#"
                INSERT OR IGNORE INTO user_verb_progress (
                    user_id, verb_id, skill_type, pronoun, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                "#,
                params![
                    key.user_id,
                    key.verb_id,
                    key.skill_type.as_str(),
                    key.pronoun.map(|p| p.as_str()),
                    now,
                ],
            )?;

            let record = tx.query_row(
                &format!(
                    r#"
                    SELECT {} FROM user_verb_progress
                    WHERE user_id = ?1 AND verb_id = ?2 AND skill_type = ?3 AND pronoun IS ?4
                    "#,
                    ProgressRecord::COLUMNS
                ),
                params![
                    key.user_id,
                    key.verb_id,
                    key.skill_type.as_str(),
                    key.pronoun.map(|p| p.as_str()),
                ],
                ProgressRecord::from_row,
            )?;

            Ok((record, inserted > 0))
        })
    }

    /// Persist the fields changed by a correct answer; returns rows updated
    pub fn save_correct_answer(&self, record: &ProgressRecord) -> Result<usize> {
        self.db.execute(|conn| {
            let updated = conn.execute(
                r#"
                UPDATE user_verb_progress
                SET correct_count = ?1, streak = ?2, mastered = ?3, last_answer_at = ?4, updated_at = ?5
                WHERE id = ?6
                "#,
                params![
                    record.correct_count,
                    record.streak,
                    record.mastered,
                    record.last_answer_at,
                    record.updated_at,
                    record.id,
                ],
            )?;
            Ok(updated)
        })
    }

    /// Persist the fields changed by a wrong answer; returns rows updated
    pub fn save_wrong_answer(&self, record: &ProgressRecord) -> Result<usize> {
        self.db.execute(|conn| {
            let updated = conn.execute(
                r#"
                UPDATE user_verb_progress
                SET wrong_count = ?1, streak = ?2, mastered = ?3, last_answer_at = ?4, updated_at = ?5
                WHERE id = ?6
                "#,
                params![
                    record.wrong_count,
                    record.streak,
                    record.mastered,
                    record.last_answer_at,
                    record.updated_at,
                    record.id,
                ],
            )?;
            Ok(updated)
        })
    }

    /// List a user's progress records, optionally for one skill
    pub fn list_progress(
        &self,
        user_id: &str,
        skill_type: Option<SkillType>,
    ) -> Result<Vec<ProgressRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {} FROM user_verb_progress
                WHERE user_id = ?1 AND (?2 IS NULL OR skill_type = ?2)
                ORDER BY verb_id, skill_type, id
                "#,
                ProgressRecord::COLUMNS
            ))?;
            let records = stmt
                .query_map(
                    params![user_id, skill_type.map(|s| s.as_str())],
                    ProgressRecord::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    /// Count tracked and mastered records per skill for a user
    pub fn progress_summary(&self, user_id: &str) -> Result<Vec<SkillSummary>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT skill_type, COUNT(*), COALESCE(SUM(mastered), 0)
                FROM user_verb_progress
                WHERE user_id = ?1
                GROUP BY skill_type
                "#,
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut summary = rows
                .into_iter()
                .map(|(skill, tracked, mastered)| {
                    Ok(SkillSummary {
                        skill_type: skill.parse()?,
                        tracked,
                        mastered,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            summary.sort_by_key(|s| SkillType::ALL.iter().position(|k| *k == s.skill_type));
            Ok(summary)
        })
    }
}
