/*!
 * Closed vocabularies for verb metadata.
 *
 * Every enumerated category is stored in the database as its German
 * display value (or, for cases, as the short case code) and parsed back
 * through `FromStr`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::UnknownValueError;

/// Look up `value` among `all` by the stored spelling
fn parse_value<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    name: fn(T) -> &'static str,
) -> Result<T, UnknownValueError> {
    let trimmed = value.trim();
    all.iter()
        .copied()
        .find(|candidate| name(*candidate) == trimmed)
        .ok_or_else(|| UnknownValueError {
            kind,
            value: trimmed.to_string(),
            allowed: all.iter().map(|c| name(*c)).collect(),
        })
}

/// Grammatical tense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tense {
    /// Present tense
    #[serde(rename = "Präsens")]
    Praesens,
    /// Simple past
    #[serde(rename = "Präteritum")]
    Praeteritum,
    /// Compound past (auxiliary + participle)
    #[serde(rename = "Perfekt")]
    Perfekt,
}

impl Tense {
    pub const ALL: [Tense; 3] = [Tense::Praesens, Tense::Praeteritum, Tense::Perfekt];

    /// Tenses that have one stored form per pronoun
    pub const SIMPLE: [Tense; 2] = [Tense::Praesens, Tense::Praeteritum];

    pub fn as_str(self) -> &'static str {
        match self {
            Tense::Praesens => "Präsens",
            Tense::Praeteritum => "Präteritum",
            Tense::Perfekt => "Perfekt",
        }
    }

    /// Whether forms of this tense are stored rather than composed
    pub fn is_simple(self) -> bool {
        matches!(self, Tense::Praesens | Tense::Praeteritum)
    }
}

impl fmt::Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tense {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("tense", s, &Self::ALL, Self::as_str)
    }
}

/// Personal pronoun, in canonical paradigm order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pronoun {
    #[serde(rename = "ich")]
    Ich,
    #[serde(rename = "du")]
    Du,
    #[serde(rename = "er/sie/es")]
    Er,
    #[serde(rename = "wir")]
    Wir,
    #[serde(rename = "ihr")]
    Ihr,
    #[serde(rename = "sie")]
    Sie,
}

impl Pronoun {
    pub const ALL: [Pronoun; 6] = [
        Pronoun::Ich,
        Pronoun::Du,
        Pronoun::Er,
        Pronoun::Wir,
        Pronoun::Ihr,
        Pronoun::Sie,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Pronoun::Ich => "ich",
            Pronoun::Du => "du",
            Pronoun::Er => "er/sie/es",
            Pronoun::Wir => "wir",
            Pronoun::Ihr => "ihr",
            Pronoun::Sie => "sie",
        }
    }
}

impl fmt::Display for Pronoun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pronoun {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("pronoun", s, &Self::ALL, Self::as_str)
    }
}

/// Conjugation class of a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerbType {
    #[default]
    #[serde(rename = "schwach")]
    Regular,
    #[serde(rename = "stark")]
    Strong,
    #[serde(rename = "gemischt")]
    Mixed,
}

impl VerbType {
    pub const ALL: [VerbType; 3] = [VerbType::Regular, VerbType::Strong, VerbType::Mixed];

    pub fn as_str(self) -> &'static str {
        match self {
            VerbType::Regular => "schwach",
            VerbType::Strong => "stark",
            VerbType::Mixed => "gemischt",
        }
    }
}

impl fmt::Display for VerbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerbType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("verb_type", s, &Self::ALL, Self::as_str)
    }
}

/// CEFR proficiency level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum CefrLevel {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("level", s, &Self::ALL, Self::as_str)
    }
}

/// Reflexivity of a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Reflexivity {
    #[default]
    #[serde(rename = "nicht reflexiv")]
    NonReflexive,
    #[serde(rename = "reflexiv")]
    Reflexive,
    /// Usable both with and without a reflexive pronoun
    #[serde(rename = "teilreflexiv")]
    PartlyReflexive,
}

impl Reflexivity {
    pub const ALL: [Reflexivity; 3] = [
        Reflexivity::NonReflexive,
        Reflexivity::Reflexive,
        Reflexivity::PartlyReflexive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Reflexivity::NonReflexive => "nicht reflexiv",
            Reflexivity::Reflexive => "reflexiv",
            Reflexivity::PartlyReflexive => "teilreflexiv",
        }
    }
}

impl fmt::Display for Reflexivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reflexivity {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("reflexivitaet", s, &Self::ALL, Self::as_str)
    }
}

/// German grammatical case
///
/// Stored as the short code (`AKK`); parsing also accepts the full German
/// name (`Akkusativ`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GermanCase {
    #[serde(rename = "NOM")]
    Nominative,
    #[serde(rename = "AKK")]
    Accusative,
    #[serde(rename = "DAT")]
    Dative,
    #[serde(rename = "GEN")]
    Genitive,
}

impl GermanCase {
    pub const ALL: [GermanCase; 4] = [
        GermanCase::Nominative,
        GermanCase::Accusative,
        GermanCase::Dative,
        GermanCase::Genitive,
    ];

    /// Cases a verb itself may govern
    pub const GOVERNED: [GermanCase; 2] = [GermanCase::Accusative, GermanCase::Dative];

    pub fn code(self) -> &'static str {
        match self {
            GermanCase::Nominative => "NOM",
            GermanCase::Accusative => "AKK",
            GermanCase::Dative => "DAT",
            GermanCase::Genitive => "GEN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GermanCase::Nominative => "Nominativ",
            GermanCase::Accusative => "Akkusativ",
            GermanCase::Dative => "Dativ",
            GermanCase::Genitive => "Genitiv",
        }
    }

    /// Parse a case a verb may govern directly (accusative or dative)
    pub fn parse_governed(value: &str) -> Result<Self, UnknownValueError> {
        let case: GermanCase = value.parse()?;
        if Self::GOVERNED.contains(&case) {
            Ok(case)
        } else {
            Err(UnknownValueError {
                kind: "case",
                value: value.trim().to_string(),
                allowed: Self::GOVERNED
                    .iter()
                    .flat_map(|c| [c.code(), c.label()])
                    .collect(),
            })
        }
    }
}

impl fmt::Display for GermanCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for GermanCase {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("case", s, &Self::ALL, Self::code)
            .or_else(|_| parse_value("case", s, &Self::ALL, Self::label))
            .map_err(|mut e| {
                e.allowed = Self::ALL.iter().flat_map(|c| [c.code(), c.label()]).collect();
                e
            })
    }
}

/// Case requirement of a preposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrepositionCase {
    #[serde(rename = "AKK")]
    Accusative,
    #[serde(rename = "DAT")]
    Dative,
    #[serde(rename = "GEN")]
    Genitive,
    /// Two-way preposition (accusative or dative)
    #[serde(rename = "MIXED")]
    Mixed,
}

impl PrepositionCase {
    pub const ALL: [PrepositionCase; 4] = [
        PrepositionCase::Accusative,
        PrepositionCase::Dative,
        PrepositionCase::Genitive,
        PrepositionCase::Mixed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PrepositionCase::Accusative => "AKK",
            PrepositionCase::Dative => "DAT",
            PrepositionCase::Genitive => "GEN",
            PrepositionCase::Mixed => "MIXED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PrepositionCase::Accusative => "Akkusativ",
            PrepositionCase::Dative => "Dativ",
            PrepositionCase::Genitive => "Genitiv",
            PrepositionCase::Mixed => "gemischt",
        }
    }
}

impl fmt::Display for PrepositionCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PrepositionCase {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("case_requirement", s, &Self::ALL, Self::code)
            .or_else(|_| parse_value("case_requirement", s, &Self::ALL, Self::label))
    }
}

/// Auxiliary verb used to build the Perfekt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuxiliaryVerb {
    Haben,
    Sein,
}

impl AuxiliaryVerb {
    pub const ALL: [AuxiliaryVerb; 2] = [AuxiliaryVerb::Haben, AuxiliaryVerb::Sein];

    pub fn as_str(self) -> &'static str {
        match self {
            AuxiliaryVerb::Haben => "haben",
            AuxiliaryVerb::Sein => "sein",
        }
    }
}

impl fmt::Display for AuxiliaryVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuxiliaryVerb {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("auxiliary", s, &Self::ALL, Self::as_str)
    }
}

/// Kind of practice exercise a progress record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    /// Recall the translation of the infinitive
    Translation,
    /// Conjugate in the present tense
    Praesens,
    /// Conjugate in the simple past
    Praeteritum,
    /// Build the Perfekt
    Perfekt,
}

impl SkillType {
    pub const ALL: [SkillType; 4] = [
        SkillType::Translation,
        SkillType::Praesens,
        SkillType::Praeteritum,
        SkillType::Perfekt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::Translation => "translation",
            SkillType::Praesens => "praesens",
            SkillType::Praeteritum => "praeteritum",
            SkillType::Perfekt => "perfekt",
        }
    }

    /// Tense drilled by this skill, if any
    pub fn tense(self) -> Option<Tense> {
        match self {
            SkillType::Translation => None,
            SkillType::Praesens => Some(Tense::Praesens),
            SkillType::Praeteritum => Some(Tense::Praeteritum),
            SkillType::Perfekt => Some(Tense::Perfekt),
        }
    }

    /// Whether records of this skill are kept per pronoun
    pub fn is_pronoun_specific(self) -> bool {
        self.tense().is_some()
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillType {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value("skill_type", s, &Self::ALL, Self::as_str)
    }
}
