use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::path::Path;

use crate::app_config::Config;
use crate::conjugation::ConjugationResolver;
use crate::database::{
    DatabaseConnection, DatabaseStats, LearningUnitRecord, ProgressRecord, Repository,
    SkillSummary, VerbPrepositionRecord, VerbRecord,
};
use crate::errors::{AppError, ConjugationError};
use crate::grammar::{CefrLevel, GermanCase, PrepositionCase, Pronoun, SkillType, Tense};
use crate::importer::{ImportOptions, ImportReport, VerbImporter};
use crate::language_utils;
use crate::progress::ProgressTracker;

// @module: Application controller for the practice and curation commands

type Result<T> = std::result::Result<T, AppError>;

/// Everything known about one verb, ready for display
#[derive(Debug, Clone)]
pub struct VerbOverview {
    pub verb: VerbRecord,
    /// Paradigm per tense; `None` where a form cannot be resolved
    pub paradigms: Vec<(Tense, Vec<(Pronoun, Option<String>)>)>,
    /// (language code, translation)
    pub translation: Option<(String, String)>,
    pub prepositions: Vec<VerbPrepositionRecord>,
}

impl fmt::Display for VerbOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = &self.verb;
        writeln!(f, "{} [{}, {}]", verb.infinitive, verb.verb_type, verb.level)?;
        if let Some((code, translation)) = &self.translation {
            writeln!(f, "  {}: {}", code, translation)?;
        }
        writeln!(
            f,
            "  {}{}",
            verb.reflexivity,
            if verb.is_separable { ", trennbar" } else { "" }
        )?;
        if let Some(case) = verb.governed_case {
            writeln!(f, "  + {}", case.label())?;
        }
        if !self.prepositions.is_empty() {
            let prepositions: Vec<String> = self.prepositions.iter().map(|p| p.to_string()).collect();
            writeln!(f, "  Präpositionen: {}", prepositions.join(", "))?;
        }

        for (tense, forms) in &self.paradigms {
            writeln!(f, "\n  {}", tense)?;
            for (pronoun, form) in forms {
                match form {
                    Some(form) if tense.is_simple() => writeln!(f, "    {:<10} {}", pronoun, form)?,
                    Some(form) => writeln!(f, "    {}", form)?,
                    None => writeln!(f, "    {:<10} -", pronoun)?,
                }
            }
        }
        Ok(())
    }
}

/// Result of grading one practice answer
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub expected: String,
    pub progress: ProgressRecord,
}

/// A progress record with the verb resolved
#[derive(Debug, Clone)]
pub struct ProgressEntry {
    pub infinitive: String,
    pub record: ProgressRecord,
}

impl fmt::Display for ProgressEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.record;
        write!(
            f,
            "{:<16} {:<12} {:<10} streak {:>2}  ✓{} ✗{}{}",
            self.infinitive,
            r.skill_type,
            r.pronoun.map_or("-", |p| p.as_str()),
            r.streak,
            r.correct_count,
            r.wrong_count,
            if r.mastered { "  mastered" } else { "" }
        )
    }
}

/// Normalize whitespace and case before comparing answers
fn normalize_answer(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Spellings a learner may use for `pronoun` at the start of an answer
fn pronoun_spellings(pronoun: Pronoun) -> &'static [&'static str] {
    match pronoun {
        Pronoun::Ich => &["ich"],
        Pronoun::Du => &["du"],
        Pronoun::Er => &["er/sie/es", "er", "sie", "es"],
        Pronoun::Wir => &["wir"],
        Pronoun::Ihr => &["ihr"],
        Pronoun::Sie => &["sie"],
    }
}

fn strip_pronoun<'a>(text: &'a str, spellings: &[&str]) -> &'a str {
    spellings
        .iter()
        .find_map(|s| text.strip_prefix(s).and_then(|rest| rest.strip_prefix(' ')))
        .unwrap_or(text)
}

/// Compare a learner's answer with the expected form; the leading pronoun may
/// be omitted or, for er/sie/es, given as any one of the three
fn answers_match(expected: &str, given: &str, pronoun: Option<Pronoun>) -> bool {
    let expected = normalize_answer(expected);
    let given = normalize_answer(given);
    if expected == given {
        return true;
    }

    pronoun.is_some_and(|p| {
        let spellings = pronoun_spellings(p);
        strip_pronoun(&expected, spellings) == strip_pronoun(&given, spellings)
    })
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    repo: Repository,
}

impl Controller {
    /// Create a controller backed by an in-memory database with default configuration
    pub fn new_for_test() -> anyhow::Result<Self> {
        Ok(Self::with_repository(Config::default(), Repository::new_in_memory()?))
    }

    /// Create a controller opening the database named by the configuration
    pub fn with_config(config: Config) -> anyhow::Result<Self> {
        let db_path = config.database_file()?;
        info!("Using database at {:?}", db_path);
        let repo = Repository::new(DatabaseConnection::new(&db_path)?);
        Ok(Self::with_repository(config, repo))
    }

    pub fn with_repository(config: Config, repo: Repository) -> Self {
        Self { config, repo }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    fn find_verb(&self, infinitive: &str) -> Result<VerbRecord> {
        self.repo
            .get_verb_by_infinitive(infinitive.trim())?
            .ok_or_else(|| AppError::VerbNotFound(infinitive.trim().to_string()))
    }

    /// Import a payload file or directory, showing a progress bar
    pub fn import(&self, path: &Path, options: ImportOptions) -> Result<ImportReport> {
        if !path.exists() {
            return Err(AppError::File(format!("Import path does not exist: {:?}", path)));
        }

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} verbs ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        info!("Importing from {:?} ({:?})", path, options.policy);
        let importer = VerbImporter::new(self.repo.clone(), options).with_progress_bar(progress_bar.clone());
        let result = importer.import_path(path);
        progress_bar.finish_and_clear();

        let report = result?;
        info!(
            "Import complete: {} created, {} updated",
            report.total_created(),
            report.total_updated()
        );
        Ok(report)
    }

    /// Conjugate a verb for one pronoun, or for all six when none is given
    pub fn conjugate(
        &self,
        infinitive: &str,
        tense: Tense,
        pronoun: Option<Pronoun>,
    ) -> Result<Vec<(Pronoun, String)>> {
        let verb = self.find_verb(infinitive)?;
        let resolver = ConjugationResolver::new(self.repo.clone());

        match pronoun {
            Some(pronoun) => Ok(vec![(pronoun, resolver.resolve(&verb, tense, pronoun)?)]),
            None => Ok(resolver.conjugate_all(&verb, tense)?),
        }
    }

    /// Collect paradigms, translation and prepositions of a verb
    pub fn show_verb(&self, infinitive: &str, language: Option<&str>) -> Result<VerbOverview> {
        let verb = self.find_verb(infinitive)?;
        let resolver = ConjugationResolver::new(self.repo.clone());

        let mut paradigms = Vec::new();
        for tense in Tense::ALL {
            let mut forms = Vec::new();
            for pronoun in Pronoun::ALL {
                let form = match resolver.resolve(&verb, tense, pronoun) {
                    Ok(form) => Some(form),
                    Err(ConjugationError::NotFound { .. } | ConjugationError::InvalidState { .. }) => None,
                    Err(e) => return Err(e.into()),
                };
                forms.push((pronoun, form));
            }
            paradigms.push((tense, forms));
        }

        let language = language.unwrap_or(self.config.translation_language.as_str());
        let code = language_utils::normalize_language_code(language)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let translation = self
            .repo
            .get_translation(verb.id, &code)?
            .map(|text| (code, text));
        let prepositions = self.repo.list_verb_prepositions(verb.id)?;

        Ok(VerbOverview {
            verb,
            paradigms,
            translation,
            prepositions,
        })
    }

    /// Expected answer for a practice item
    fn expected_answer(&self, verb: &VerbRecord, skill: SkillType, pronoun: Option<Pronoun>) -> Result<String> {
        match (skill.tense(), pronoun) {
            (Some(tense), Some(pronoun)) => {
                let resolver = ConjugationResolver::new(self.repo.clone());
                Ok(resolver.resolve(verb, tense, pronoun)?)
            }
            (None, _) => {
                let code = language_utils::normalize_language_code(&self.config.translation_language)
                    .map_err(|e| AppError::Config(e.to_string()))?;
                self.repo
                    .get_translation(verb.id, &code)?
                    .ok_or_else(|| AppError::TranslationNotFound {
                        infinitive: verb.infinitive.clone(),
                        language: code,
                    })
            }
            (Some(_), None) => Err(AppError::Progress(crate::errors::ProgressError::InvalidKey(format!(
                "skill '{}' requires a pronoun",
                skill
            )))),
        }
    }

    /// Grade a learner's answer and update their progress
    pub fn answer(
        &self,
        user_id: &str,
        infinitive: &str,
        skill: SkillType,
        pronoun: Option<Pronoun>,
        given: &str,
    ) -> Result<AnswerOutcome> {
        let verb = self.find_verb(infinitive)?;
        let expected = self.expected_answer(&verb, skill, pronoun)?;
        let correct = answers_match(&expected, given, pronoun);
        debug!("Answer '{}' for {} {}: expected '{}'", given, infinitive, skill, expected);

        let tracker = ProgressTracker::new(self.repo.clone());
        let progress = tracker.record_answer(user_id, verb.id, skill, pronoun, correct)?;

        Ok(AnswerOutcome {
            correct,
            expected,
            progress,
        })
    }

    /// Record an already-graded outcome
    pub fn record_outcome(
        &self,
        user_id: &str,
        infinitive: &str,
        skill: SkillType,
        pronoun: Option<Pronoun>,
        correct: bool,
    ) -> Result<ProgressRecord> {
        let verb = self.find_verb(infinitive)?;
        let tracker = ProgressTracker::new(self.repo.clone());
        Ok(tracker.record_answer(user_id, verb.id, skill, pronoun, correct)?)
    }

    /// Progress records of a user, optionally for one skill
    pub fn progress(&self, user_id: &str, skill: Option<SkillType>) -> Result<Vec<ProgressEntry>> {
        let records = self.repo.list_progress(user_id, skill)?;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let infinitive = match self.repo.get_verb(record.verb_id)? {
                Some(verb) => verb.infinitive,
                None => {
                    warn!("Progress record {} references missing verb {}", record.id, record.verb_id);
                    format!("#{}", record.verb_id)
                }
            };
            entries.push(ProgressEntry { infinitive, record });
        }
        Ok(entries)
    }

    pub fn progress_summary(&self, user_id: &str) -> Result<Vec<SkillSummary>> {
        let tracker = ProgressTracker::new(self.repo.clone());
        Ok(tracker.summary(user_id)?)
    }

    /// Create a learning unit
    pub fn create_unit(&self, title: &str, level: CefrLevel, tense: Tense, order: u32) -> Result<LearningUnitRecord> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Unit title must not be empty".to_string()));
        }

        let mut unit = LearningUnitRecord::new(title, level, tense, order);
        unit.id = self.repo.create_learning_unit(&unit)?;
        info!("Created learning unit {} '{}'", unit.id, unit.title);
        Ok(unit)
    }

    /// Add a verb to a unit; returns false if it was already there
    pub fn add_verb_to_unit(&self, unit_id: i64, infinitive: &str) -> Result<bool> {
        if self.repo.get_learning_unit(unit_id)?.is_none() {
            return Err(AppError::UnitNotFound(unit_id));
        }
        let verb = self.find_verb(infinitive)?;
        Ok(self.repo.add_verb_to_unit(unit_id, verb.id)?)
    }

    /// Learning units in order with their verbs
    pub fn list_units(&self, level: Option<CefrLevel>) -> Result<Vec<(LearningUnitRecord, Vec<VerbRecord>)>> {
        let units = self.repo.list_learning_units(level)?;
        let mut result = Vec::with_capacity(units.len());
        for unit in units {
            let verbs = self.repo.list_unit_verbs(unit.id)?;
            result.push((unit, verbs));
        }
        Ok(result)
    }

    /// Link a preposition to a verb, creating the preposition if needed
    pub fn add_preposition(
        &self,
        infinitive: &str,
        text: &str,
        requirement: PrepositionCase,
        governed_case: Option<GermanCase>,
    ) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Preposition must not be empty".to_string()));
        }

        let verb = self.find_verb(infinitive)?;
        let preposition = self.repo.ensure_preposition(text, requirement)?;
        if preposition.case_requirement != requirement {
            warn!(
                "Preposition '{}' already recorded with case {}",
                preposition.text, preposition.case_requirement
            );
        }
        Ok(self.repo.link_preposition(verb.id, preposition.id, governed_case)?)
    }

    pub fn stats(&self) -> Result<DatabaseStats> {
        Ok(self.repo.database().stats()?)
    }
}
