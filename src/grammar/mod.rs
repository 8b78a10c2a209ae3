/*!
 * German grammar vocabulary shared by the store, the resolver and the importer.
 */

pub mod auxiliary;
pub mod choices;

// Re-export main types
pub use auxiliary::auxiliary_form;
pub use choices::{
    AuxiliaryVerb, CefrLevel, GermanCase, PrepositionCase, Pronoun, Reflexivity, SkillType, Tense,
    VerbType,
};
