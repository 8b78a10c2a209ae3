/*!
 * Integration tests for bulk import against an on-disk database
 */

use anyhow::Result;
use serde_json::json;

use konjugator::errors::{AppError, ImportError};
use konjugator::grammar::{AuxiliaryVerb, GermanCase, Pronoun, Tense, VerbType};
use konjugator::importer::{ImportOptions, ImportPolicy};

use crate::common;

fn fill() -> ImportOptions {
    ImportOptions::default()
}

fn force() -> ImportOptions {
    ImportOptions {
        policy: ImportPolicy::Force,
        debug: false,
    }
}

#[test]
fn test_import_samplePayload_shouldStoreVerbsFormsAndTranslations() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let payload = common::write_payload(temp_dir.path(), "verbs.json", &common::sample_payload())?;
    let controller = common::controller_in(temp_dir.path())?;

    let report = controller.import(&payload, fill())?;

    assert_eq!(report.files, 1);
    assert_eq!(report.verbs.created, 2);
    assert_eq!(report.forms.created, 17);
    assert_eq!(report.translations.created, 3);

    let repo = controller.repository();
    let machen = repo.get_verb_by_infinitive("machen")?.expect("machen imported");
    assert_eq!(machen.verb_type, VerbType::Regular);
    assert_eq!(machen.governed_case, Some(GermanCase::Accusative));
    assert_eq!(machen.auxiliary, Some(AuxiliaryVerb::Haben));
    assert_eq!(repo.list_forms(machen.id)?.len(), 12);
    assert_eq!(repo.get_translation(machen.id, "ru")?.as_deref(), Some("делать"));

    let stats = controller.stats()?;
    assert_eq!(stats.verb_count, 2);
    assert!(stats.file_size_bytes > 0);
    Ok(())
}

#[test]
fn test_import_samePayloadTwiceWithFill_shouldReportNoUpdates() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let payload = common::write_payload(temp_dir.path(), "verbs.json", &common::sample_payload())?;
    let controller = common::controller_in(temp_dir.path())?;

    controller.import(&payload, fill())?;
    let second = controller.import(&payload, fill())?;

    assert_eq!(second.total_created(), 0);
    assert_eq!(second.total_updated(), 0);
    assert_eq!(second.verbs.skipped, 2);
    assert_eq!(second.forms.skipped, 17);
    assert_eq!(second.translations.skipped, 3);
    assert!(second.fields.values().all(|counts| counts.updated == 0));
    Ok(())
}

#[test]
fn test_import_samePayloadTwiceWithForce_shouldUpdateEverySuppliedField() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let payload = common::write_payload(temp_dir.path(), "verbs.json", &common::sample_payload())?;
    let controller = common::controller_in(temp_dir.path())?;

    controller.import(&payload, force())?;
    let second = controller.import(&payload, force())?;

    assert_eq!(second.total_created(), 0);
    assert_eq!(second.verbs.updated, 2);
    assert_eq!(second.forms.updated, 17);
    assert_eq!(second.translations.updated, 3);
    assert_eq!(second.fields["participle_ii"].updated, 2);
    assert_eq!(second.fields["verb_type"].updated, 2);
    assert_eq!(second.fields["case"].updated, 1);
    assert!(second.fields.values().all(|counts| counts.skipped == 0));
    Ok(())
}

#[test]
fn test_import_forceAfterFill_shouldOverwriteChangedValues() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let controller = common::controller_in(temp_dir.path())?;
    let first = common::write_payload(temp_dir.path(), "first.json", &common::sample_payload())?;
    controller.import(&first, fill())?;

    let correction = json!({
        "verbs": [{
            "infinitive": "gehen",
            "case": "",
            "forms": {"Präsens": {"ich": "gehe!"}},
            "translations": {"eng": "to walk"}
        }]
    });
    let correction = common::write_payload(temp_dir.path(), "correction.json", &correction)?;

    controller.import(&correction, fill())?;
    let repo = controller.repository();
    let gehen = repo.get_verb_by_infinitive("gehen")?.expect("gehen imported");
    assert_eq!(repo.get_form(gehen.id, Tense::Praesens, Pronoun::Ich)?.as_deref(), Some("gehe"));

    controller.import(&correction, force())?;
    assert_eq!(repo.get_form(gehen.id, Tense::Praesens, Pronoun::Ich)?.as_deref(), Some("gehe!"));
    assert_eq!(repo.get_translation(gehen.id, "en")?.as_deref(), Some("to walk"));
    Ok(())
}

#[test]
fn test_import_withInvalidSecondItem_shouldKeepFirstItem() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let controller = common::controller_in(temp_dir.path())?;
    let payload = json!({
        "verbs": [
            {"infinitive": "sehen", "verb_type": "stark"},
            {"infinitive": "lesen", "forms": {"Futur": {"ich": "werde lesen"}}}
        ]
    });
    let payload = common::write_payload(temp_dir.path(), "verbs.json", &payload)?;

    let result = controller.import(&payload, fill());

    assert!(matches!(result, Err(AppError::Import(ImportError::Validation(_)))));
    assert!(controller.repository().get_verb_by_infinitive("sehen")?.is_some());
    assert!(controller.repository().get_verb_by_infinitive("lesen")?.is_none());
    Ok(())
}

#[test]
fn test_import_malformedFile_shouldWriteNothing() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let controller = common::controller_in(temp_dir.path())?;
    let payload = common::create_test_file(temp_dir.path(), "verbs.json", r#"[{"infinitive": "sehen"}]"#)?;

    let result = controller.import(&payload, fill());

    assert!(matches!(result, Err(AppError::Import(ImportError::Malformed(_)))));
    assert_eq!(controller.stats()?.verb_count, 0);
    Ok(())
}

#[test]
fn test_import_directory_shouldImportEveryJsonFile() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let data_dir = temp_dir.path().join("data");
    std::fs::create_dir_all(data_dir.join("nested"))?;
    common::write_payload(&data_dir, "a.json", &json!({"verbs": [{"infinitive": "kommen"}]}))?;
    common::write_payload(&data_dir.join("nested"), "b.json", &json!({"verbs": [{"infinitive": "laufen"}]}))?;
    common::create_test_file(&data_dir, "README.txt", "not a payload")?;
    let controller = common::controller_in(temp_dir.path())?;

    let report = controller.import(&data_dir, fill())?;

    assert_eq!(report.files, 2);
    assert_eq!(report.verbs.created, 2);
    Ok(())
}

#[test]
fn test_import_missingPath_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::controller_in(temp_dir.path())?;

    let result = controller.import(&temp_dir.path().join("missing.json"), fill());

    assert!(matches!(result, Err(AppError::File(_))));
    Ok(())
}
