/*!
 * Applies import payloads to the verb catalogue.
 *
 * Every item is written in its own transaction. An invalid item rolls back
 * and stops the run; items before it stay committed.
 */

use indicatif::ProgressBar;
use log::{debug, info, warn};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::database::{Repository, VerbRecord};
use crate::errors::ImportError;
use crate::grammar::Reflexivity;
use crate::importer::payload::{ImportPayload, ParsedVerb, Patch};

/// How existing data is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportPolicy {
    /// Only fill attributes, forms and translations that are not set yet
    #[default]
    FillIfAbsent,
    /// Overwrite everything the payload supplies
    Force,
}

/// Import behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub policy: ImportPolicy,
    /// Report every skipped value at info level
    pub debug: bool,
}

/// Created/updated/skipped tally for one kind of entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl EntityCounts {
    fn merge(&mut self, other: &EntityCounts) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
    }
}

impl fmt::Display for EntityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={}, updated={}, skipped={}",
            self.created, self.updated, self.skipped
        )
    }
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub files: usize,
    pub items: usize,
    pub verbs: EntityCounts,
    pub forms: EntityCounts,
    pub translations: EntityCounts,
    /// Verb attribute name -> counts (`created` is unused here)
    pub fields: BTreeMap<&'static str, EntityCounts>,
}

impl ImportReport {
    pub fn merge(&mut self, other: &ImportReport) {
        self.files += other.files;
        self.items += other.items;
        self.verbs.merge(&other.verbs);
        self.forms.merge(&other.forms);
        self.translations.merge(&other.translations);
        for (field, counts) in &other.fields {
            self.fields.entry(*field).or_default().merge(counts);
        }
    }

    /// Writes to existing data across all entities and fields
    pub fn total_updated(&self) -> usize {
        self.verbs.updated + self.forms.updated + self.translations.updated
    }

    pub fn total_created(&self) -> usize {
        self.verbs.created + self.forms.created + self.translations.created
    }

    fn field_updated(&mut self, field: &'static str) {
        self.fields.entry(field).or_default().updated += 1;
    }

    fn field_skipped(&mut self, field: &'static str) {
        self.fields.entry(field).or_default().skipped += 1;
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Imported {} item(s) from {} file(s)", self.items, self.files)?;
        writeln!(f, "  Verbs:        {}", self.verbs)?;
        writeln!(f, "  Forms:        {}", self.forms)?;
        write!(f, "  Translations: {}", self.translations)?;
        for (field, counts) in &self.fields {
            write!(
                f,
                "\n  {:<13} updated={}, skipped={}",
                format!("{}:", field),
                counts.updated,
                counts.skipped
            )?;
        }
        Ok(())
    }
}

/// Loads verb payloads into the repository
pub struct VerbImporter {
    repo: Repository,
    options: ImportOptions,
    progress: ProgressBar,
}

impl VerbImporter {
    pub fn new(repo: Repository, options: ImportOptions) -> Self {
        Self {
            repo,
            options,
            progress: ProgressBar::hidden(),
        }
    }

    /// Advance `progress` once per imported item
    pub fn with_progress_bar(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Import a single JSON file, or every `*.json` file under a directory
    pub fn import_path(&self, path: &Path) -> Result<ImportReport, ImportError> {
        if path.is_dir() {
            let files = Self::find_payload_files(path)?;
            if files.is_empty() {
                warn!("No .json files found in {:?}", path);
            }

            let mut report = ImportReport::default();
            for file in files {
                report.merge(&self.import_file(&file)?);
            }
            Ok(report)
        } else {
            self.import_file(path)
        }
    }

    /// Import one JSON file
    pub fn import_file(&self, path: &Path) -> Result<ImportReport, ImportError> {
        info!("Importing verbs from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut report = self.import_str(&content)?;
        report.files = 1;
        Ok(report)
    }

    /// Import a JSON document
    pub fn import_str(&self, json: &str) -> Result<ImportReport, ImportError> {
        let payload = ImportPayload::from_json(json)?;
        self.import_payload(&payload)
    }

    /// Import an already-deserialized payload
    pub fn import_payload(&self, payload: &ImportPayload) -> Result<ImportReport, ImportError> {
        self.progress.set_length(payload.verbs.len() as u64);

        let mut report = ImportReport::default();
        for (i, entry) in payload.verbs.iter().enumerate() {
            let parsed = entry.parse(i + 1)?;
            self.progress.set_message(parsed.infinitive.clone());

            let item = self
                .repo
                .database()
                .transaction(|tx| self.apply(tx, &parsed))
                .inspect_err(|e| warn!("Import stopped at item {}: {}", i + 1, e))?;

            report.merge(&item);
            self.progress.inc(1);
        }

        debug!(
            "Import finished: {} created, {} updated",
            report.total_created(),
            report.total_updated()
        );
        Ok(report)
    }

    fn find_payload_files(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| ImportError::Io(e.into()))?;
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    fn force(&self) -> bool {
        self.options.policy == ImportPolicy::Force
    }

    fn skip(&self, infinitive: &str, what: &str, existing: &str) {
        if self.options.debug {
            info!("SKIP {} {}: existing '{}'", infinitive, what, existing);
        } else {
            debug!("SKIP {} {}: existing '{}'", infinitive, what, existing);
        }
    }

    /// Apply one validated item inside a transaction
    fn apply(&self, conn: &Connection, parsed: &ParsedVerb) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport {
            items: 1,
            ..ImportReport::default()
        };

        let (mut verb, created) = match Repository::fetch_verb_by_infinitive(conn, &parsed.infinitive)? {
            Some(verb) => (verb, false),
            None => {
                let mut verb = VerbRecord::new(&parsed.infinitive);
                verb.id = Repository::insert_verb_row(conn, &verb)?;
                (verb, true)
            }
        };

        let changed = self.apply_attributes(&mut verb, created, parsed, &mut report);
        if changed {
            Repository::update_verb_row(conn, &verb)?;
        }

        if created {
            report.verbs.created += 1;
        } else if changed {
            report.verbs.updated += 1;
        } else {
            report.verbs.skipped += 1;
        }

        for (tense, pronoun, form) in &parsed.forms {
            match Repository::fetch_form(conn, verb.id, *tense, *pronoun)? {
                None => {
                    Repository::write_form(conn, verb.id, *tense, *pronoun, form)?;
                    report.forms.created += 1;
                }
                Some(existing) if self.force() || existing.trim().is_empty() => {
                    Repository::write_form(conn, verb.id, *tense, *pronoun, form)?;
                    report.forms.updated += 1;
                }
                Some(existing) => {
                    self.skip(
                        &verb.infinitive,
                        &format!("{} {}", tense, pronoun),
                        &existing,
                    );
                    report.forms.skipped += 1;
                }
            }
        }

        for (code, translation) in &parsed.translations {
            match Repository::fetch_translation(conn, verb.id, code)? {
                None => {
                    Repository::write_translation(conn, verb.id, code, translation)?;
                    report.translations.created += 1;
                }
                Some(existing) if self.force() || existing.trim().is_empty() => {
                    Repository::write_translation(conn, verb.id, code, translation)?;
                    report.translations.updated += 1;
                }
                Some(existing) => {
                    self.skip(
                        &verb.infinitive,
                        &format!("translation[{}]", code),
                        &existing,
                    );
                    report.translations.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Merge supplied attributes into `verb`; returns whether anything was written
    fn apply_attributes(
        &self,
        verb: &mut VerbRecord,
        created: bool,
        parsed: &ParsedVerb,
        report: &mut ImportReport,
    ) -> bool {
        let force = self.force();
        let mut changed = false;
        let infinitive = verb.infinitive.clone();

        // Defaulted attributes count as absent only on a verb this item created
        macro_rules! defaulted {
            ($field:ident, $name:literal) => {
                if let Some(value) = parsed.$field {
                    if force || created {
                        verb.$field = value;
                        report.field_updated($name);
                        changed = true;
                    } else {
                        self.skip(&infinitive, $name, verb.$field.as_str());
                        report.field_skipped($name);
                    }
                }
            };
        }

        defaulted!(verb_type, "verb_type");
        defaulted!(level, "level");

        // A stored "nicht reflexiv" is the default and counts as unset
        if let Some(value) = parsed.reflexivity {
            let unset = verb.reflexivity == Reflexivity::NonReflexive && value != verb.reflexivity;
            if force || created || unset {
                verb.reflexivity = value;
                report.field_updated("reflexivity");
                changed = true;
            } else {
                self.skip(&infinitive, "reflexivity", verb.reflexivity.as_str());
                report.field_skipped("reflexivity");
            }
        }

        if let Some(value) = parsed.is_separable {
            if force || created || (!verb.is_separable && value) {
                verb.is_separable = value;
                report.field_updated("is_separable");
                changed = true;
            } else {
                self.skip(&infinitive, "is_separable", &verb.is_separable.to_string());
                report.field_skipped("is_separable");
            }
        }

        if let Some(patch) = &parsed.governed_case {
            changed |= Self::apply_patch(
                force,
                &mut verb.governed_case,
                patch.clone(),
                "case",
                report,
            );
        }
        if let Some(patch) = &parsed.auxiliary {
            changed |= Self::apply_patch(force, &mut verb.auxiliary, patch.clone(), "auxiliary", report);
        }
        if let Some(patch) = &parsed.participle_ii {
            changed |= Self::apply_patch(
                force,
                &mut verb.participle_ii,
                patch.clone(),
                "participle_ii",
                report,
            );
        }

        if !changed {
            debug!("No attribute changes for '{}'", infinitive);
        }
        changed
    }

    /// Optional attributes: forced writes always land (an empty value clears);
    /// otherwise only an unset attribute is filled
    fn apply_patch<T: fmt::Debug>(
        force: bool,
        slot: &mut Option<T>,
        patch: Patch<T>,
        name: &'static str,
        report: &mut ImportReport,
    ) -> bool {
        if force {
            *slot = patch.into_option();
            report.field_updated(name);
            return true;
        }

        match (slot.is_some(), patch) {
            (false, Patch::Set(value)) => {
                *slot = Some(value);
                report.field_updated(name);
                true
            }
            (false, Patch::Clear) => false,
            (true, _) => {
                debug!("SKIP {}: existing {:?}", name, slot);
                report.field_skipped(name);
                false
            }
        }
    }
}
