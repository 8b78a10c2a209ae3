/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;

use konjugator::Controller;
use konjugator::app_config::Config;
use konjugator::grammar::{Pronoun, SkillType, Tense};
use konjugator::importer::ImportOptions;

use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withTestConfig_shouldStartEmpty() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let stats = controller.stats()?;
    assert_eq!(stats.verb_count, 0);
    assert_eq!(stats.progress_count, 0);
    assert_eq!(controller.config(), &Config::default());
    Ok(())
}

/// Test that data survives reopening the database file
#[test]
fn test_controller_reopen_shouldKeepCatalogueAndProgress() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let payload = common::write_payload(temp_dir.path(), "verbs.json", &common::sample_payload())?;

    {
        let controller = common::controller_in(temp_dir.path())?;
        controller.import(&payload, ImportOptions::default())?;
        controller.answer("max", "machen", SkillType::Praeteritum, Some(Pronoun::Du), "machtest")?;
    }

    let controller = common::controller_in(temp_dir.path())?;
    let stats = controller.stats()?;
    assert_eq!(stats.verb_count, 2);
    assert_eq!(stats.progress_count, 1);

    let progress = controller.progress("max", None)?;
    assert_eq!(progress[0].record.streak, 1);
    assert_eq!(
        controller.conjugate("machen", Tense::Praeteritum, Some(Pronoun::Du))?[0].1,
        "machtest"
    );
    Ok(())
}

/// Test the controller with a configured translation language
#[test]
fn test_controller_withRussianTranslationLanguage_shouldShowRussian() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let payload = common::write_payload(temp_dir.path(), "verbs.json", &common::sample_payload())?;
    let config = Config {
        database_path: Some(temp_dir.path().join("ru.db").to_string_lossy().into_owned()),
        translation_language: "rus".to_string(),
        ..Config::default()
    };
    config.validate()?;
    let controller = Controller::with_config(config)?;
    controller.import(&payload, ImportOptions::default())?;

    let overview = controller.show_verb("machen", None)?;
    assert_eq!(overview.translation, Some(("ru".to_string(), "делать".to_string())));

    let outcome = controller.answer("max", "machen", SkillType::Translation, None, "делать")?;
    assert!(outcome.correct);
    Ok(())
}
