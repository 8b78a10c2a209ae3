/*!
 * Bulk import payload format and item validation.
 *
 * ```json
 * {
 *   "verbs": [
 *     {
 *       "infinitive": "gehen",
 *       "verb_type": "stark",
 *       "level": "A1",
 *       "is_trennbare": false,
 *       "reflexivitaet": "nicht reflexiv",
 *       "case": "AKK",
 *       "perfekt": { "auxiliary": "sein", "participle_ii": "gegangen" },
 *       "forms": { "Präsens": { "ich": "gehe" }, "Präteritum": { "ich": "ging" } },
 *       "translations": { "en": "to go" }
 *     }
 *   ]
 * }
 * ```
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::{ImportError, UnknownValueError};
use crate::grammar::{AuxiliaryVerb, CefrLevel, GermanCase, Pronoun, Reflexivity, Tense, VerbType};
use crate::language_utils;

/// Top-level import document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPayload {
    pub verbs: Vec<VerbEntry>,
}

impl ImportPayload {
    /// Parse a JSON document; anything but `{"verbs": [object...]}` is malformed
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        serde_json::from_str(json).map_err(|e| ImportError::Malformed(e.to_string()))
    }
}

/// One verb as it appears in the payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbEntry {
    pub infinitive: Option<String>,
    pub verb_type: Option<String>,
    pub level: Option<String>,
    /// Boolean, number, or a yes/no style string
    pub is_trennbare: Option<Value>,
    pub reflexivitaet: Option<String>,
    pub case: Option<String>,
    pub perfekt: Option<PerfektEntry>,
    /// tense -> pronoun -> form
    pub forms: Option<BTreeMap<String, BTreeMap<String, Option<String>>>>,
    /// language code -> translation
    pub translations: Option<BTreeMap<String, Option<String>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfektEntry {
    pub auxiliary: Option<String>,
    pub participle_ii: Option<String>,
}

/// Change requested for an optional verb attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Set(T),
    /// Empty string in the payload
    Clear,
}

impl<T> Patch<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Clear => None,
        }
    }
}

/// A validated payload item, ready to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerb {
    pub infinitive: String,
    pub verb_type: Option<VerbType>,
    pub level: Option<CefrLevel>,
    pub is_separable: Option<bool>,
    pub reflexivity: Option<Reflexivity>,
    pub governed_case: Option<Patch<GermanCase>>,
    pub auxiliary: Option<Patch<AuxiliaryVerb>>,
    pub participle_ii: Option<Patch<String>>,
    pub forms: Vec<(Tense, Pronoun, String)>,
    /// (ISO 639-1 code, translation)
    pub translations: Vec<(String, String)>,
}

fn for_verb(error: UnknownValueError, infinitive: &str) -> ImportError {
    ImportError::Validation(format!("{} (verb '{}')", error, infinitive))
}

/// Trim a string field; empty means "not supplied"
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_patch<T>(
    value: &Option<String>,
    parse: impl FnOnce(&str) -> Result<T, UnknownValueError>,
    infinitive: &str,
) -> Result<Option<Patch<T>>, ImportError> {
    match value.as_deref().map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(Patch::Clear)),
        Some(v) => parse(v)
            .map(|parsed| Some(Patch::Set(parsed)))
            .map_err(|e| for_verb(e, infinitive)),
    }
}

/// Interpret the loosely typed separable-prefix flag
fn parse_flag(value: &Value, infinitive: &str) -> Result<Option<bool>, ImportError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(n) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "n" | "off" => Ok(Some(false)),
            _ => Err(ImportError::Validation(format!(
                "Invalid is_trennbare '{}' for verb '{}'. Expected boolean.",
                s, infinitive
            ))),
        },
        other => Err(ImportError::Validation(format!(
            "Invalid is_trennbare '{}' for verb '{}'. Expected boolean.",
            other, infinitive
        ))),
    }
}

impl VerbEntry {
    /// Validate the entry at 1-based position `index`
    pub fn parse(&self, index: usize) -> Result<ParsedVerb, ImportError> {
        let infinitive = non_empty(&self.infinitive)
            .ok_or_else(|| {
                ImportError::Validation(format!(
                    "Invalid verb entry at index {}: missing 'infinitive'",
                    index
                ))
            })?
            .to_string();
        let inf = infinitive.as_str();

        let verb_type = non_empty(&self.verb_type)
            .map(|v| v.parse::<VerbType>().map_err(|e| for_verb(e, inf)))
            .transpose()?;
        let level = non_empty(&self.level)
            .map(|v| v.parse::<CefrLevel>().map_err(|e| for_verb(e, inf)))
            .transpose()?;
        let reflexivity = non_empty(&self.reflexivitaet)
            .map(|v| v.parse::<Reflexivity>().map_err(|e| for_verb(e, inf)))
            .transpose()?;
        let is_separable = match &self.is_trennbare {
            Some(value) => parse_flag(value, inf)?,
            None => None,
        };

        let governed_case = parse_patch(&self.case, GermanCase::parse_governed, inf)?;
        let perfekt = self.perfekt.clone().unwrap_or_default();
        let auxiliary = parse_patch(&perfekt.auxiliary, |v| v.parse::<AuxiliaryVerb>(), inf)?;
        let participle_ii = perfekt.participle_ii.as_deref().map(|p| match p.trim() {
            "" => Patch::Clear,
            trimmed => Patch::Set(trimmed.to_string()),
        });

        let mut forms = Vec::new();
        for (tense_name, pronoun_map) in self.forms.iter().flatten() {
            let tense = tense_name
                .parse::<Tense>()
                .ok()
                .filter(|t| t.is_simple())
                .ok_or_else(|| {
                    ImportError::Validation(format!(
                        "Invalid tense '{}' for verb '{}'. Allowed: {:?}",
                        tense_name,
                        inf,
                        Tense::SIMPLE.map(Tense::as_str)
                    ))
                })?;

            for (pronoun_name, form) in pronoun_map {
                let pronoun = pronoun_name.parse::<Pronoun>().map_err(|e| for_verb(e, inf))?;
                let form = non_empty(form).ok_or_else(|| {
                    ImportError::Validation(format!(
                        "Empty form for verb '{}', tense '{}', pronoun '{}'",
                        inf, tense, pronoun
                    ))
                })?;
                forms.push((tense, pronoun, form.to_string()));
            }
        }

        let mut translations = Vec::new();
        for (code, translation) in self.translations.iter().flatten() {
            let code = language_utils::normalize_language_code(code).map_err(|e| {
                ImportError::Validation(format!(
                    "Invalid translation language_code for verb '{}': {}",
                    inf, e
                ))
            })?;
            let translation = non_empty(translation).ok_or_else(|| {
                ImportError::Validation(format!(
                    "Empty translation for verb '{}', language '{}'",
                    inf, code
                ))
            })?;
            translations.push((code, translation.to_string()));
        }

        Ok(ParsedVerb {
            infinitive,
            verb_type,
            level,
            is_separable,
            reflexivity,
            governed_case,
            auxiliary,
            participle_ii,
            forms,
            translations,
        })
    }
}
