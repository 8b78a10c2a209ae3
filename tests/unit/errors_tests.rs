/*!
 * Tests for error types and conversions
 */

use konjugator::errors::{AppError, ConjugationError, ImportError, ProgressError, UnknownValueError};
use konjugator::grammar::Tense;

#[test]
fn test_unknownValueError_shouldListAllowedValues() {
    let error = "Futur".parse::<Tense>().unwrap_err();
    let display = format!("{}", error);
    assert!(display.contains("Invalid tense 'Futur'"));
    assert!(display.contains("Präsens"));
    assert!(display.contains("Perfekt"));
}

#[test]
fn test_conjugationError_notFound_shouldDisplayCorrectly() {
    let error = ConjugationError::NotFound {
        infinitive: "machen".to_string(),
        tense: "Präsens".to_string(),
        pronoun: "ich".to_string(),
    };
    assert_eq!(format!("{}", error), "Missing form for machen Präsens ich");
}

#[test]
fn test_conjugationError_invalidState_shouldNameMissingAttribute() {
    let error = ConjugationError::InvalidState {
        infinitive: "gehen".to_string(),
        missing: "auxiliary",
    };
    let display = format!("{}", error);
    assert!(display.contains("gehen"));
    assert!(display.contains("auxiliary"));
}

#[test]
fn test_importError_fromUnknownValue_shouldBecomeValidation() {
    let unknown = UnknownValueError {
        kind: "level",
        value: "Z9".to_string(),
        allowed: vec!["A1", "A2"],
    };
    let error: ImportError = unknown.into();
    assert!(matches!(error, ImportError::Validation(ref msg) if msg.contains("Z9")));
}

#[test]
fn test_appError_fromProgressError_shouldWrapCorrectly() {
    let error: AppError = ProgressError::InvalidKey("skill 'praesens' requires a pronoun".to_string()).into();
    let display = format!("{}", error);
    assert!(display.contains("Progress error"));
    assert!(display.contains("requires a pronoun"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "verbs.json");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldKeepMessage() {
    let error: AppError = anyhow::anyhow!("database is locked").into();
    assert!(format!("{}", error).contains("database is locked"));
}

#[test]
fn test_appError_translationNotFound_shouldNameVerbAndLanguage() {
    let error = AppError::TranslationNotFound {
        infinitive: "gehen".to_string(),
        language: "ru".to_string(),
    };
    assert_eq!(format!("{}", error), "No 'ru' translation for gehen");
}
