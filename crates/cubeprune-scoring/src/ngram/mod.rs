//! N-gram language-model scoring.

pub mod feature;
pub mod model;

pub use feature::LanguageModelFeature;
pub use model::{MapNgramModel, NgramModel};
