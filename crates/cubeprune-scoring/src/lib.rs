//! Incremental feature-function scoring for the cubeprune search core.
//!
//! This crate provides:
//! - The [`FeatureFunction`] contract every cost model implements
//! - The [`NodeResult`] builder pricing one rule × antecedent combination
//! - The stateful n-gram language-model feature and its model interface
//! - A stateless word-penalty feature

pub mod feature;
pub mod ngram;
pub mod result;
pub mod word_penalty;

#[cfg(test)]
mod test_utils;

pub use feature::{FeatureFunction, FeatureRegistry, Transition};
pub use ngram::{LanguageModelFeature, MapNgramModel, NgramModel};
pub use result::NodeResult;
pub use word_penalty::WordPenaltyFeature;
