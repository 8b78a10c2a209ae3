/*!
 * Integration tests for conjugation and progress tracking through the controller
 */

use anyhow::Result;
use serde_json::json;

use konjugator::Controller;
use konjugator::errors::{AppError, ConjugationError};
use konjugator::grammar::{CefrLevel, GermanCase, PrepositionCase, Pronoun, SkillType, Tense};
use konjugator::importer::ImportOptions;
use konjugator::progress::STREAK_TO_MASTER;

use crate::common;

fn imported_controller(dir: &std::path::Path) -> Result<Controller> {
    common::init_logger();
    let payload = common::write_payload(dir, "verbs.json", &common::sample_payload())?;
    let controller = common::controller_in(dir)?;
    controller.import(&payload, ImportOptions::default())?;
    Ok(controller)
}

#[test]
fn test_conjugate_simpleTenses_shouldReturnStoredForms() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    let present = controller.conjugate("machen", Tense::Praesens, None)?;
    let past = controller.conjugate("machen", Tense::Praeteritum, Some(Pronoun::Ihr))?;

    assert_eq!(present.len(), 6);
    assert_eq!(present[2], (Pronoun::Er, "macht".to_string()));
    assert_eq!(past, vec![(Pronoun::Ihr, "machtet".to_string())]);
    Ok(())
}

#[test]
fn test_conjugate_perfekt_shouldComposeAuxiliaryAndParticiple() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    let machen = controller.conjugate("machen", Tense::Perfekt, Some(Pronoun::Ich))?;
    let gehen = controller.conjugate("gehen", Tense::Perfekt, None)?;

    assert_eq!(machen[0].1, "ich habe gemacht");
    assert_eq!(gehen[0].1, "ich bin gegangen");
    assert_eq!(gehen[4].1, "ihr seid gegangen");
    Ok(())
}

#[test]
fn test_conjugate_missingForm_shouldReturnNotFound() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    let result = controller.conjugate("gehen", Tense::Praeteritum, Some(Pronoun::Wir));

    assert!(matches!(
        result,
        Err(AppError::Conjugation(ConjugationError::NotFound { .. }))
    ));
    Ok(())
}

#[test]
fn test_conjugate_perfektWithoutParticiple_shouldReturnInvalidState() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;
    let payload = json!({"verbs": [{"infinitive": "sehen", "perfekt": {"auxiliary": "haben"}}]});
    let payload = common::write_payload(temp_dir.path(), "sehen.json", &payload)?;
    controller.import(&payload, ImportOptions::default())?;

    for pronoun in Pronoun::ALL {
        let result = controller.conjugate("sehen", Tense::Perfekt, Some(pronoun));
        assert!(matches!(
            result,
            Err(AppError::Conjugation(ConjugationError::InvalidState { missing: "participle_ii", .. }))
        ));
    }
    Ok(())
}

#[test]
fn test_answer_fiveCorrectThenWrong_shouldMasterThenReset() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    let mut last = None;
    for _ in 0..STREAK_TO_MASTER {
        last = Some(controller.answer("lena", "gehen", SkillType::Perfekt, Some(Pronoun::Du), "bist gegangen")?);
    }
    let mastered = last.expect("at least one answer");
    assert!(mastered.correct);
    assert_eq!(mastered.progress.streak, 5);
    assert!(mastered.progress.mastered);

    let wrong = controller.answer("lena", "gehen", SkillType::Perfekt, Some(Pronoun::Du), "hast gegangen")?;
    assert!(!wrong.correct);
    assert_eq!(wrong.expected, "du bist gegangen");
    assert_eq!(wrong.progress.streak, 0);
    assert!(!wrong.progress.mastered);
    assert_eq!(wrong.progress.correct_count, 5);
    assert_eq!(wrong.progress.wrong_count, 1);
    Ok(())
}

#[test]
fn test_recordOutcome_wrongThenFourCorrect_shouldNotMaster() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    controller.record_outcome("lena", "machen", SkillType::Praesens, Some(Pronoun::Wir), false)?;
    let mut record = None;
    for _ in 0..4 {
        record = Some(controller.record_outcome("lena", "machen", SkillType::Praesens, Some(Pronoun::Wir), true)?);
    }

    let record = record.expect("at least one answer");
    assert_eq!(record.streak, 4);
    assert!(!record.mastered);
    Ok(())
}

#[test]
fn test_progress_translationSkill_shouldKeepOneRecordWithoutPronoun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    controller.answer("lena", "machen", SkillType::Translation, None, "to make")?;
    controller.answer("lena", "machen", SkillType::Translation, None, "to do")?;
    controller.answer("lena", "gehen", SkillType::Praesens, Some(Pronoun::Ich), "gehe")?;

    let translation = controller.progress("lena", Some(SkillType::Translation))?;
    assert_eq!(translation.len(), 1);
    assert_eq!(translation[0].infinitive, "machen");
    assert_eq!(translation[0].record.pronoun, None);
    assert_eq!(translation[0].record.attempts(), 2);

    let summary = controller.progress_summary("lena")?;
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].skill_type, SkillType::Translation);
    assert!(controller.progress("someone-else", None)?.is_empty());
    Ok(())
}

#[test]
fn test_answer_withPronounForTranslation_shouldRejectKey() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    let result = controller.answer("lena", "machen", SkillType::Translation, Some(Pronoun::Ich), "to make");

    assert!(matches!(result, Err(AppError::Progress(_))));
    Ok(())
}

#[test]
fn test_unitsAndPrepositions_shouldAppearInListings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = imported_controller(temp_dir.path())?;

    let second = controller.create_unit("Bewegung", CefrLevel::A1, Tense::Perfekt, 2)?;
    let first = controller.create_unit("Alltag", CefrLevel::A1, Tense::Praesens, 1)?;
    controller.add_verb_to_unit(first.id, "machen")?;
    controller.add_verb_to_unit(second.id, "gehen")?;

    let units = controller.list_units(Some(CefrLevel::A1))?;
    let titles: Vec<&str> = units.iter().map(|(unit, _)| unit.title.as_str()).collect();
    assert_eq!(titles, ["Alltag", "Bewegung"]);
    assert_eq!(units[1].1[0].infinitive, "gehen");
    assert!(controller.list_units(Some(CefrLevel::B1))?.is_empty());

    assert!(controller.add_preposition("gehen", "in", PrepositionCase::Mixed, Some(GermanCase::Accusative))?);
    assert!(!controller.add_preposition("gehen", "in", PrepositionCase::Mixed, Some(GermanCase::Accusative))?);
    assert!(controller.add_preposition("gehen", "mit", PrepositionCase::Dative, None)?);

    let overview = controller.show_verb("gehen", Some("en"))?;
    let prepositions: Vec<String> = overview.prepositions.iter().map(|p| p.to_string()).collect();
    assert_eq!(prepositions, ["in (AKK)", "mit"]);
    assert!(overview.to_string().contains("to go"));
    Ok(())
}
