/*!
 * Present-tense conjugation of the Perfekt auxiliaries.
 */

use super::choices::{AuxiliaryVerb, Pronoun};

/// Present-tense form of `auxiliary` for `pronoun`
pub const fn auxiliary_form(auxiliary: AuxiliaryVerb, pronoun: Pronoun) -> &'static str {
    match (auxiliary, pronoun) {
        (AuxiliaryVerb::Haben, Pronoun::Ich) => "habe",
        (AuxiliaryVerb::Haben, Pronoun::Du) => "hast",
        (AuxiliaryVerb::Haben, Pronoun::Er) => "hat",
        (AuxiliaryVerb::Haben, Pronoun::Wir) => "haben",
        (AuxiliaryVerb::Haben, Pronoun::Ihr) => "habt",
        (AuxiliaryVerb::Haben, Pronoun::Sie) => "haben",
        (AuxiliaryVerb::Sein, Pronoun::Ich) => "bin",
        (AuxiliaryVerb::Sein, Pronoun::Du) => "bist",
        (AuxiliaryVerb::Sein, Pronoun::Er) => "ist",
        (AuxiliaryVerb::Sein, Pronoun::Wir) => "sind",
        (AuxiliaryVerb::Sein, Pronoun::Ihr) => "seid",
        (AuxiliaryVerb::Sein, Pronoun::Sie) => "sind",
    }
}
