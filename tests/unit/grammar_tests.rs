/*!
 * Tests for the grammar vocabulary
 */

use konjugator::grammar::{
    AuxiliaryVerb, CefrLevel, PrepositionCase, Pronoun, Reflexivity, SkillType, Tense, VerbType,
    auxiliary_form,
};

#[test]
fn test_auxiliaryForm_shouldCoverEveryPronoun() {
    let haben: Vec<_> = Pronoun::ALL.iter().map(|p| auxiliary_form(AuxiliaryVerb::Haben, *p)).collect();
    let sein: Vec<_> = Pronoun::ALL.iter().map(|p| auxiliary_form(AuxiliaryVerb::Sein, *p)).collect();

    assert_eq!(haben, ["habe", "hast", "hat", "haben", "habt", "haben"]);
    assert_eq!(sein, ["bin", "bist", "ist", "sind", "seid", "sind"]);
}

#[test]
fn test_fromStr_withStoredValues_shouldRoundTrip() {
    for level in CefrLevel::ALL {
        assert_eq!(level.to_string().parse::<CefrLevel>().unwrap(), level);
    }
    for verb_type in VerbType::ALL {
        assert_eq!(verb_type.to_string().parse::<VerbType>().unwrap(), verb_type);
    }
    for reflexivity in Reflexivity::ALL {
        assert_eq!(reflexivity.to_string().parse::<Reflexivity>().unwrap(), reflexivity);
    }
    for skill in SkillType::ALL {
        assert_eq!(skill.to_string().parse::<SkillType>().unwrap(), skill);
    }
}

#[test]
fn test_skillType_tense_shouldMapConjugationSkills() {
    assert_eq!(SkillType::Translation.tense(), None);
    assert_eq!(SkillType::Praesens.tense(), Some(Tense::Praesens));
    assert_eq!(SkillType::Perfekt.tense(), Some(Tense::Perfekt));
}

#[test]
fn test_prepositionCase_fromStr_shouldAcceptCodes() {
    assert_eq!("DAT".parse::<PrepositionCase>().unwrap(), PrepositionCase::Dative);
    assert_eq!("MIXED".parse::<PrepositionCase>().unwrap(), PrepositionCase::Mixed);
    assert!("LOC".parse::<PrepositionCase>().is_err());
}

#[test]
fn test_pronoun_serde_shouldUseGermanText() {
    let json = serde_json::to_string(&Pronoun::Er).unwrap();
    assert_eq!(json, "\"er/sie/es\"");
    let tense: Tense = serde_json::from_str("\"Präteritum\"").unwrap();
    assert_eq!(tense, Tense::Praeteritum);
}
