/*!
 * Tests for ISO language code utilities
 */

use konjugator::language_utils::{get_language_name, language_codes_match, normalize_language_code};

#[test]
fn test_normalizeLanguageCode_withVariousForms_shouldReturnPart1() {
    assert_eq!(normalize_language_code("en").unwrap(), "en");
    assert_eq!(normalize_language_code("ENG").unwrap(), "en");
    assert_eq!(normalize_language_code(" rus ").unwrap(), "ru");
    assert_eq!(normalize_language_code("ger").unwrap(), "de");
}

#[test]
fn test_normalizeLanguageCode_withUnknownCode_shouldFail() {
    assert!(normalize_language_code("xx").is_err());
    assert!(normalize_language_code("").is_err());
}

#[test]
fn test_languageCodesMatch_acrossCodeLengths_shouldMatch() {
    assert!(language_codes_match("de", "deu"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("de", "en"));
    assert!(!language_codes_match("de", "invalid"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ru").unwrap(), "Russian");
    assert!(get_language_name("zz").is_err());
}
