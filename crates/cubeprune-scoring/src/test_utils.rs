//! Test fixtures shared across this crate's test modules.
//!
//! Provides a small trigram model over a toy vocabulary, plus helpers for
//! building rules and state-carrying nodes.

use std::sync::Arc;

use cubeprune_core::{
    BoundaryWords, DPState, FeatureId, HGNode, NgramDPState, NodeArena, NodeId, Rule, Span,
    StateSet, Symbol, TargetToken, Vocabulary,
};

use crate::feature::FeatureRegistry;
use crate::ngram::{LanguageModelFeature, MapNgramModel, NgramModel};

/// Registry identity of the fixture's language-model feature.
pub const LM_ID: FeatureId = FeatureId(1);

/// A trigram model, its vocabulary, and a ready-made LM feature.
pub struct TrigramFixture {
    pub vocab: Arc<Vocabulary>,
    pub model: Arc<MapNgramModel>,
    pub lm: LanguageModelFeature,
    /// Nonterminal head symbol used by fixture rules.
    pub nt: Symbol,
}

impl TrigramFixture {
    /// Looks up an already-interned word.
    pub fn sym(&self, name: &str) -> Symbol {
        self.vocab
            .lookup(name)
            .unwrap_or_else(|| panic!("fixture vocabulary is missing {name:?}"))
    }

    /// A rule over the given target tokens.
    pub fn rule_tokens(&self, target: Vec<TargetToken>, baseline_cost: f64) -> Rule {
        Rule::new(self.nt, vec![], target, baseline_cost).unwrap()
    }

    /// An all-terminal rule over the given words.
    pub fn terminal_rule(&self, words: &[&str], baseline_cost: f64) -> Rule {
        let target = words
            .iter()
            .map(|w| TargetToken::Terminal(self.sym(w)))
            .collect();
        self.rule_tokens(target, baseline_cost)
    }

    /// Model cost (−log p) of one n-gram, backoff included.
    pub fn cost_of(&self, words: &[&str]) -> f64 {
        let ngram: Vec<Symbol> = words.iter().map(|w| self.sym(w)).collect();
        -self.model.ngram_log_probability(&ngram)
    }

    /// The log backoff weight the fixture stores for the (cat, sat)
    /// context, as charged when a marker follows it.
    pub fn backoff_charge_at_marker(&self) -> f64 {
        -0.15
    }
}

/// Builds the shared trigram fixture.
pub fn trigram_fixture() -> TrigramFixture {
    let mut vocab = Vocabulary::new();
    let nt = vocab.intern("X");
    let words: Vec<Symbol> = ["a", "the", "cat", "sat", "on", "mat", "dog"]
        .iter()
        .map(|w| vocab.intern(w))
        .collect();
    let [a, the, cat, sat, on, mat, _dog] = words[..] else {
        unreachable!()
    };
    let start = vocab.start();
    let stop = vocab.stop();

    let mut model = MapNgramModel::new(3);
    model.insert_ngram(&[a], -0.9);
    model.insert_ngram(&[the], -1.0);
    model.insert_ngram(&[cat], -1.2);
    model.insert_ngram(&[sat], -1.4);
    model.insert_ngram(&[on], -1.1);
    model.insert_ngram(&[mat], -1.3);
    model.insert_ngram(&[a, the], -0.45);
    model.insert_ngram(&[the, cat], -0.5);
    model.insert_ngram(&[cat, sat], -0.6);
    model.insert_ngram(&[sat, on], -0.55);
    model.insert_ngram(&[start, the], -0.4);
    model.insert_ngram(&[a, the, cat], -0.35);
    model.insert_ngram(&[the, cat, sat], -0.3);
    model.insert_ngram(&[cat, sat, on], -0.28);
    model.insert_ngram(&[start, the, cat], -0.25);
    model.insert_ngram(&[cat, sat, stop], -0.2);
    model.insert_backoff(&[cat, sat], -0.15);

    let vocab = Arc::new(vocab);
    let model = Arc::new(model);
    let lm = LanguageModelFeature::new(
        LM_ID,
        1.0,
        3,
        Arc::clone(&vocab),
        Arc::clone(&model) as Arc<dyn NgramModel>,
    )
    .unwrap();
    TrigramFixture {
        vocab,
        model,
        lm,
        nt,
    }
}

/// A new LM feature over the fixture's model, boxed into a registry.
pub fn registry_with_lm(fx: &TrigramFixture, weight: f64) -> FeatureRegistry {
    let lm = LanguageModelFeature::new(
        LM_ID,
        weight,
        3,
        Arc::clone(&fx.vocab),
        Arc::clone(&fx.model) as Arc<dyn NgramModel>,
    )
    .unwrap();
    FeatureRegistry::new().with(Box::new(lm))
}

/// Pushes a node carrying an n-gram boundary state built from words.
pub fn node_with_state(
    arena: &mut NodeArena,
    fx: &TrigramFixture,
    left: &[&str],
    right: &[&str],
) -> NodeId {
    let left: BoundaryWords = left.iter().map(|w| fx.sym(w)).collect();
    let right: BoundaryWords = right.iter().map(|w| fx.sym(w)).collect();
    let mut states = StateSet::new();
    states.insert(LM_ID, DPState::Ngram(NgramDPState::new(left, right)));
    arena.push(HGNode::new(Span::new(0, 1), fx.nt, 1.0, states))
}
