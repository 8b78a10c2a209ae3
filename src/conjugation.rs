/*!
 * Conjugation resolution.
 *
 * Simple tenses are looked up among the stored forms; the Perfekt is
 * composed from the present-tense auxiliary and the stored participle.
 */

use anyhow::Result;
use log::debug;
use std::collections::HashMap;

use crate::database::{Repository, VerbRecord};
use crate::errors::ConjugationError;
use crate::grammar::{Pronoun, Tense, auxiliary_form};

/// Source of stored simple-tense forms
pub trait FormSource {
    /// Stored form of `verb` for (tense, pronoun), if any
    fn stored_form(&self, verb: &VerbRecord, tense: Tense, pronoun: Pronoun) -> Result<Option<String>>;
}

impl FormSource for Repository {
    fn stored_form(&self, verb: &VerbRecord, tense: Tense, pronoun: Pronoun) -> Result<Option<String>> {
        self.get_form(verb.id, tense, pronoun)
    }
}

/// Forms keyed by (verb id, tense, pronoun), mostly useful in tests
impl FormSource for HashMap<(i64, Tense, Pronoun), String> {
    fn stored_form(&self, verb: &VerbRecord, tense: Tense, pronoun: Pronoun) -> Result<Option<String>> {
        Ok(self.get(&(verb.id, tense, pronoun)).cloned())
    }
}

/// Resolves (verb, tense, pronoun) to the inflected form
pub struct ConjugationResolver<S> {
    source: S,
}

impl<S: FormSource> ConjugationResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolve the form of `verb` for `tense` and `pronoun`
    pub fn resolve(
        &self,
        verb: &VerbRecord,
        tense: Tense,
        pronoun: Pronoun,
    ) -> Result<String, ConjugationError> {
        match tense {
            Tense::Praesens | Tense::Praeteritum => self.simple_tense(verb, tense, pronoun),
            Tense::Perfekt => Self::perfekt(verb, pronoun),
        }
    }

    /// Resolve with the tense given by name, as received from a caller
    pub fn resolve_named(
        &self,
        verb: &VerbRecord,
        tense: &str,
        pronoun: Pronoun,
    ) -> Result<String, ConjugationError> {
        let tense: Tense = tense
            .parse()
            .map_err(|_| ConjugationError::UnsupportedTense(tense.trim().to_string()))?;
        self.resolve(verb, tense, pronoun)
    }

    /// Resolve all six persons of `tense` in paradigm order
    pub fn conjugate_all(
        &self,
        verb: &VerbRecord,
        tense: Tense,
    ) -> Result<Vec<(Pronoun, String)>, ConjugationError> {
        Pronoun::ALL
            .iter()
            .map(|pronoun| Ok((*pronoun, self.resolve(verb, tense, *pronoun)?)))
            .collect()
    }

    fn simple_tense(
        &self,
        verb: &VerbRecord,
        tense: Tense,
        pronoun: Pronoun,
    ) -> Result<String, ConjugationError> {
        self.source
            .stored_form(verb, tense, pronoun)?
            .ok_or_else(|| {
                debug!("No stored form for {} {} {}", verb.infinitive, tense, pronoun);
                ConjugationError::NotFound {
                    infinitive: verb.infinitive.clone(),
                    tense: tense.to_string(),
                    pronoun: pronoun.to_string(),
                }
            })
    }

    fn perfekt(verb: &VerbRecord, pronoun: Pronoun) -> Result<String, ConjugationError> {
        let auxiliary = verb.auxiliary.ok_or_else(|| ConjugationError::InvalidState {
            infinitive: verb.infinitive.clone(),
            missing: "auxiliary",
        })?;

        let participle = verb
            .participle_ii
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ConjugationError::InvalidState {
                infinitive: verb.infinitive.clone(),
                missing: "participle_ii",
            })?;

        Ok(format!(
            "{} {} {}",
            pronoun,
            auxiliary_form(auxiliary, pronoun),
            participle
        ))
    }
}
