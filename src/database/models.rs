/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grammar::{
    AuxiliaryVerb, CefrLevel, GermanCase, PrepositionCase, Pronoun, Reflexivity, SkillType, Tense,
    VerbType,
};

/// Read a text column into one of the closed grammar enums
fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable text column into one of the closed grammar enums
fn parse_optional_column<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| {
        value
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Verb record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbRecord {
    /// Database ID
    pub id: i64,
    /// Infinitive, unique across the catalogue
    pub infinitive: String,
    /// Conjugation class
    pub verb_type: VerbType,
    /// CEFR level
    pub level: CefrLevel,
    /// Reflexivity
    pub reflexivity: Reflexivity,
    /// Has a separable prefix
    pub is_separable: bool,
    /// Case governed by the verb (accusative or dative)
    pub governed_case: Option<GermanCase>,
    /// Perfekt auxiliary
    pub auxiliary: Option<AuxiliaryVerb>,
    /// Past participle
    pub participle_ii: Option<String>,
}

impl VerbRecord {
    pub(crate) const COLUMNS: &'static str = "id, infinitive, verb_type, level, reflexivity, \
        is_separable, governed_case, auxiliary, participle_ii";

    /// Create a new verb with catalogue defaults (without database ID)
    pub fn new(infinitive: impl Into<String>) -> Self {
        Self {
            id: 0, // Will be assigned by database
            infinitive: infinitive.into(),
            verb_type: VerbType::default(),
            level: CefrLevel::default(),
            reflexivity: Reflexivity::default(),
            is_separable: false,
            governed_case: None,
            auxiliary: None,
            participle_ii: None,
        }
    }

    /// Set the Perfekt auxiliary and participle
    pub fn with_perfekt(mut self, auxiliary: AuxiliaryVerb, participle_ii: impl Into<String>) -> Self {
        self.auxiliary = Some(auxiliary);
        self.participle_ii = Some(participle_ii.into());
        self
    }

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            infinitive: row.get(1)?,
            verb_type: parse_column(row, 2)?,
            level: parse_column(row, 3)?,
            reflexivity: parse_column(row, 4)?,
            is_separable: row.get(5)?,
            governed_case: parse_optional_column(row, 6)?,
            auxiliary: parse_optional_column(row, 7)?,
            participle_ii: row.get(8)?,
        })
    }
}

impl fmt::Display for VerbRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.infinitive)
    }
}

/// Stored simple-tense form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbFormRecord {
    pub id: i64,
    pub verb_id: i64,
    pub tense: Tense,
    pub pronoun: Pronoun,
    pub form: String,
}

impl VerbFormRecord {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            verb_id: row.get(1)?,
            tense: parse_column(row, 2)?,
            pronoun: parse_column(row, 3)?,
            form: row.get(4)?,
        })
    }
}

/// Translation of a verb into one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: i64,
    pub verb_id: i64,
    /// ISO 639-1 code
    pub language_code: String,
    pub translation: String,
}

impl TranslationRecord {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            verb_id: row.get(1)?,
            language_code: row.get(2)?,
            translation: row.get(3)?,
        })
    }
}

/// Preposition record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepositionRecord {
    pub id: i64,
    pub text: String,
    pub case_requirement: PrepositionCase,
}

impl PrepositionRecord {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            case_requirement: parse_column(row, 2)?,
        })
    }
}

/// Preposition governed by a verb, joined with the preposition itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbPrepositionRecord {
    pub id: i64,
    pub verb_id: i64,
    pub preposition: PrepositionRecord,
    /// Case override for this verb; falls back to the preposition's requirement
    pub governed_case: Option<GermanCase>,
}

impl fmt::Display for VerbPrepositionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.governed_case {
            Some(case) => write!(f, "{} ({})", self.preposition.text, case),
            None => f.write_str(&self.preposition.text),
        }
    }
}

/// Named, ordered group of verbs used to sequence lessons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningUnitRecord {
    pub id: i64,
    pub title: String,
    pub level: CefrLevel,
    pub tense: Tense,
    pub order: u32,
}

impl LearningUnitRecord {
    /// Create a new learning unit (without database ID)
    pub fn new(title: impl Into<String>, level: CefrLevel, tense: Tense, order: u32) -> Self {
        Self {
            id: 0, // Will be assigned by database
            title: title.into(),
            level,
            tense,
            order,
        }
    }

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            level: parse_column(row, 2)?,
            tense: parse_column(row, 3)?,
            order: row.get(4)?,
        })
    }
}

/// Natural key of a progress record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub user_id: String,
    pub verb_id: i64,
    pub skill_type: SkillType,
    /// Absent for skills that are not pronoun-specific
    pub pronoun: Option<Pronoun>,
}

/// Learner progress for one (user, verb, skill, pronoun) combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub user_id: String,
    pub verb_id: i64,
    pub skill_type: SkillType,
    pub pronoun: Option<Pronoun>,
    pub correct_count: u32,
    pub wrong_count: u32,
    /// Consecutive correct answers
    pub streak: u32,
    pub mastered: bool,
    pub last_answer_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    pub(crate) const COLUMNS: &'static str = "id, user_id, verb_id, skill_type, pronoun, \
        correct_count, wrong_count, streak, mastered, last_answer_at, created_at, updated_at";

    /// Total number of answers given
    pub fn attempts(&self) -> u32 {
        self.correct_count + self.wrong_count
    }

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            verb_id: row.get(2)?,
            skill_type: parse_column(row, 3)?,
            pronoun: parse_optional_column(row, 4)?,
            correct_count: row.get(5)?,
            wrong_count: row.get(6)?,
            streak: row.get(7)?,
            mastered: row.get(8)?,
            last_answer_at: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}
