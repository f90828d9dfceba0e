//! Test fixtures shared across this crate's test modules.

use std::sync::Arc;

use cubeprune_core::{
    BoundaryWords, DPState, FeatureId, HGNode, NgramDPState, NodeArena, NodeId, Rule, Span,
    StateSet, Symbol, TargetToken, Vocabulary,
};
use cubeprune_scoring::{
    FeatureRegistry, LanguageModelFeature, MapNgramModel, NgramModel, NodeResult,
};

use crate::cell::ChartCell;

/// Registry identity of the fixture's language-model feature.
pub const LM_ID: FeatureId = FeatureId(1);

/// A trigram model over a toy vocabulary, for driving the combiner.
pub struct SearchFixture {
    pub vocab: Arc<Vocabulary>,
    pub model: Arc<MapNgramModel>,
    /// Nonterminal head symbol used by fixture rules.
    pub nt: Symbol,
}

impl SearchFixture {
    /// Looks up an already-interned word.
    pub fn sym(&self, name: &str) -> Symbol {
        self.vocab
            .lookup(name)
            .unwrap_or_else(|| panic!("fixture vocabulary is missing {name:?}"))
    }

    /// A fresh registry holding one LM feature of weight 1.
    pub fn registry(&self) -> FeatureRegistry {
        let lm = LanguageModelFeature::new(
            LM_ID,
            1.0,
            3,
            Arc::clone(&self.vocab),
            Arc::clone(&self.model) as Arc<dyn NgramModel>,
        )
        .unwrap();
        FeatureRegistry::new().with(Box::new(lm))
    }

    /// An all-terminal rule over the given words.
    pub fn terminal_rule(&self, words: &[&str], baseline_cost: f64) -> Arc<Rule> {
        let target = words
            .iter()
            .map(|w| TargetToken::Terminal(self.sym(w)))
            .collect();
        Arc::new(Rule::new(self.nt, vec![], target, baseline_cost).unwrap())
    }

    /// A rule whose target is a single nonterminal slot.
    pub fn unary_rule(&self, baseline_cost: f64) -> Arc<Rule> {
        Arc::new(
            Rule::new(self.nt, vec![], vec![TargetToken::NonTerminal(0)], baseline_cost).unwrap(),
        )
    }

    /// A rule gluing two slots: `[X0 X1]`.
    pub fn binary_rule(&self, baseline_cost: f64) -> Arc<Rule> {
        Arc::new(
            Rule::new(
                self.nt,
                vec![],
                vec![TargetToken::NonTerminal(0), TargetToken::NonTerminal(1)],
                baseline_cost,
            )
            .unwrap(),
        )
    }

    /// Pushes a node with the given inside cost and boundary words.
    pub fn node(
        &self,
        arena: &mut NodeArena,
        inside_cost: f64,
        left: &[&str],
        right: &[&str],
    ) -> NodeId {
        let left: BoundaryWords = left.iter().map(|w| self.sym(w)).collect();
        let right: BoundaryWords = right.iter().map(|w| self.sym(w)).collect();
        let mut states = StateSet::new();
        states.insert(LM_ID, DPState::Ngram(NgramDPState::new(left, right)));
        arena.push(HGNode::new(Span::new(0, 1), self.nt, inside_cost, states))
    }
}

/// Builds the shared search fixture.
pub fn search_fixture() -> SearchFixture {
    let mut vocab = Vocabulary::new();
    let nt = vocab.intern("X");
    let words: Vec<Symbol> = ["a", "the", "cat", "sat", "on", "mat"]
        .iter()
        .map(|w| vocab.intern(w))
        .collect();
    let mut model = MapNgramModel::new(3);
    for (i, &w) in words.iter().enumerate() {
        model.insert_ngram(&[w], -1.0 - 0.1 * i as f64);
    }
    model.insert_ngram(&[words[1], words[2]], -0.5);
    model.insert_ngram(&[words[2], words[3]], -0.6);
    model.insert_ngram(&[words[1], words[2], words[3]], -0.3);

    SearchFixture {
        vocab: Arc::new(vocab),
        model: Arc::new(model),
        nt,
    }
}

/// Prices an all-terminal rule as an axiom, returning rule and result.
pub fn axiom_result(
    fx: &SearchFixture,
    words: &[&str],
    baseline_cost: f64,
) -> (Arc<Rule>, NodeResult) {
    let rule = fx.terminal_rule(words, baseline_cost);
    let arena = NodeArena::new();
    let result = NodeResult::compute(
        &fx.registry(),
        &rule,
        &[],
        &arena,
        Span::new(0, words.len()),
        &cubeprune_core::SourcePath::free(),
    )
    .unwrap();
    (rule, result)
}

/// A cell that records every submission in order and tracks the best
/// expected cost, with no retention policy at all.
#[derive(Debug)]
pub struct RecordingCell {
    submissions: Vec<Submission>,
    best: f64,
}

impl Default for RecordingCell {
    fn default() -> Self {
        Self::new()
    }
}

/// One recorded submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub expected_total_cost: f64,
    pub inner_cost: f64,
    pub antecedent_count: usize,
}

impl RecordingCell {
    /// Creates an empty recording cell.
    pub fn new() -> Self {
        RecordingCell {
            submissions: Vec::new(),
            best: f64::INFINITY,
        }
    }

    /// Everything submitted, in submission order.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Expected costs in submission order.
    pub fn costs(&self) -> Vec<f64> {
        self.submissions
            .iter()
            .map(|s| s.expected_total_cost)
            .collect()
    }
}

impl ChartCell for RecordingCell {
    fn add_hyper_edge(
        &mut self,
        result: NodeResult,
        _rule: Arc<Rule>,
        _span: Span,
        antecedents: &[NodeId],
        _source_path: &cubeprune_core::SourcePath,
    ) {
        let cost = result.expected_total_cost();
        if cost < self.best {
            self.best = cost;
        }
        self.submissions.push(Submission {
            expected_total_cost: cost,
            inner_cost: result.inner_cost(),
            antecedent_count: antecedents.len(),
        });
    }

    fn current_best_cost(&self) -> f64 {
        self.best
    }
}
