//! The stateful n-gram language-model feature.
//!
//! Prices the additional language-model cost created when a rule glues
//! sub-translations together, and produces the merged boundary-word state
//! the enclosing combination will score against. Semantics:
//!
//! - `transition` walks the rule's target side with a rolling buffer of at
//!   most `order` words. Terminals extend the buffer; once it holds
//!   `order` words the completed n-gram is charged and the oldest word
//!   evicted. A nonterminal substitutes its antecedent's left boundary
//!   words (charging extra backoff weights when a backoff marker is
//!   present), then the antecedent's right boundary words replace the
//!   buffer tail in place. Those right words are never charged here: they
//!   are duplicates or fragments an ancestor will finish.
//! - `final_transition` brackets the context with the sentence markers and
//!   charges the completed boundary n-grams plus the closing stop n-gram.
//! - `estimate` / `estimate_future_cost` charge complete n-grams plus any
//!   incomplete n-gram that still has a hard boundary on its left.

use std::sync::Arc;

use cubeprune_core::{
    BoundaryWords, CoreError, DPState, FeatureId, NgramDPState, NodeArena, NodeId, Result, Rule,
    SourcePath, Span, Symbol, TargetToken, Vocabulary,
};

use crate::feature::{FeatureFunction, Transition};
use crate::ngram::model::NgramModel;

/// Stateful n-gram language-model cost.
pub struct LanguageModelFeature {
    id: FeatureId,
    weight: f64,
    order: usize,
    vocab: Arc<Vocabulary>,
    model: Arc<dyn NgramModel>,
}

impl LanguageModelFeature {
    /// Creates the feature.
    ///
    /// `order` is the scoring order, which may be lower than what the
    /// model stores.
    ///
    /// # Errors
    ///
    /// Fails if `order` is zero or exceeds the model's stored order.
    pub fn new(
        id: FeatureId,
        weight: f64,
        order: usize,
        vocab: Arc<Vocabulary>,
        model: Arc<dyn NgramModel>,
    ) -> Result<Self> {
        if order == 0 {
            return Err(CoreError::Internal("n-gram order must be at least 1".into()));
        }
        if order > model.order() {
            return Err(CoreError::Internal(format!(
                "scoring order {order} exceeds model order {}",
                model.order()
            )));
        }
        Ok(LanguageModelFeature {
            id,
            weight,
            order,
            vocab,
            model,
        })
    }

    /// The scoring order.
    pub fn order(&self) -> usize {
        self.order
    }

    fn antecedent_state<'a>(
        &self,
        slot: usize,
        antecedents: &[NodeId],
        arena: &'a NodeArena,
    ) -> Result<&'a NgramDPState> {
        let id = antecedents.get(slot).copied().ok_or_else(|| {
            CoreError::Internal(format!("no antecedent bound to nonterminal slot {slot}"))
        })?;
        let node = arena.get(id)?;
        let state = node
            .states()
            .get(self.id)
            .ok_or(CoreError::MissingState(self.id.0))?
            .as_ngram()?;
        state.check_balanced()?;
        Ok(state)
    }

    fn compute_transition(
        &self,
        rule: &Rule,
        antecedents: &[NodeId],
        arena: &NodeArena,
    ) -> Result<Transition> {
        let backoff = self.vocab.backoff_marker();
        let mut current: Vec<Symbol> = Vec::with_capacity(self.order);
        let mut left_state = BoundaryWords::new();
        let mut cost = 0.0;

        for token in rule.target() {
            match *token {
                TargetToken::Terminal(word) => {
                    current.push(word);
                    if left_state.len() + 1 < self.order {
                        left_state.push(word);
                    }
                    if current.len() == self.order {
                        cost -= self.model.ngram_log_probability(&current);
                        current.remove(0);
                    }
                }
                TargetToken::NonTerminal(slot) => {
                    let state = self.antecedent_state(slot, antecedents, arena)?;
                    for (i, &word) in state.left().iter().enumerate() {
                        current.push(word);
                        if left_state.len() + 1 < self.order {
                            left_state.push(word);
                        }
                        if word == backoff {
                            // Words in front of the stored state owe their
                            // backoff weights now.
                            let additional = current.len() - (i + 1);
                            cost -= self.model.log_prob_of_backoff_state(&current, additional);
                            if current.len() == self.order {
                                current.remove(0);
                            }
                        } else if current.len() == self.order {
                            cost -= self.model.ngram_log_probability(&current);
                            current.remove(0);
                        }
                    }
                    // The right boundary replaces the buffer tail in place.
                    // Never charged here: duplicates or fragments for an
                    // ancestor to finish.
                    let tail = current.len();
                    let right = state.right();
                    for (i, &word) in right.iter().enumerate() {
                        current[tail - right.len() + i] = word;
                    }
                }
            }
        }

        let right_state: BoundaryWords = current.into_iter().collect();
        Ok(Transition::stateful(
            cost,
            DPState::Ngram(NgramDPState::new(left_state, right_state)),
        ))
    }

    fn compute_final_transition(&self, state: &NgramDPState) -> Result<f64> {
        state.check_balanced()?;
        let backoff = self.vocab.backoff_marker();
        let mut current: Vec<Symbol> = Vec::with_capacity(self.order + 1);
        let mut cost = 0.0;

        current.push(self.vocab.start());
        for (i, &word) in state.left().iter().enumerate() {
            current.push(word);
            if word == backoff {
                let additional = current.len() - (i + 1);
                cost -= self.model.log_prob_of_backoff_state(&current, additional);
            } else if current.len() >= 2 {
                // Boundary n-grams complete once <s> is in front.
                cost -= self.model.ngram_log_probability(&current);
            }
            if current.len() == self.order {
                current.remove(0);
            }
        }

        let tail = current.len();
        let right = state.right();
        for (i, &word) in right.iter().enumerate() {
            current[tail - right.len() + i] = word;
        }
        current.push(self.vocab.stop());
        cost -= self.model.ngram_log_probability(&current);
        Ok(cost)
    }

    /// Charges one maximal terminal chunk of a rule.
    ///
    /// `consider_incomplete` admits n-grams shorter than the order;
    /// `skip_start` leaves the leading `<s>` unigram unscored.
    fn score_chunk(&self, words: &[Symbol], consider_incomplete: bool, skip_start: bool) -> f64 {
        if words.is_empty() {
            return 0.0;
        }
        let start_index = if !consider_incomplete {
            self.order
        } else if skip_start {
            2
        } else {
            1
        };
        -self.model.sentence_log_probability(words, self.order, start_index)
    }
}

impl FeatureFunction for LanguageModelFeature {
    fn feature_id(&self) -> FeatureId {
        self.id
    }

    fn name(&self) -> &str {
        "ngram-lm"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn is_stateful(&self) -> bool {
        true
    }

    fn transition(
        &self,
        rule: &Rule,
        antecedents: &[NodeId],
        arena: &NodeArena,
        _span: Span,
        _source_path: &SourcePath,
    ) -> Result<Transition> {
        self.compute_transition(rule, antecedents, arena)
    }

    fn final_transition(
        &self,
        node: NodeId,
        arena: &NodeArena,
        _span: Span,
        _source_path: &SourcePath,
    ) -> Result<f64> {
        let state = arena
            .get(node)?
            .states()
            .get(self.id)
            .ok_or(CoreError::MissingState(self.id.0))?
            .as_ngram()?
            .clone();
        self.compute_final_transition(&state)
    }

    fn estimate(&self, rule: &Rule) -> f64 {
        let start = self.vocab.start();
        let mut estimate = 0.0;
        let mut words: Vec<Symbol> = Vec::new();
        let mut consider_incomplete = true;
        let mut skip_start =
            matches!(rule.target().first(), Some(TargetToken::Terminal(w)) if *w == start);

        for token in rule.target() {
            match *token {
                TargetToken::Terminal(word) => words.push(word),
                TargetToken::NonTerminal(_) => {
                    estimate += self.score_chunk(&words, consider_incomplete, skip_start);
                    consider_incomplete = true;
                    words.clear();
                    skip_start = false;
                }
            }
        }
        estimate + self.score_chunk(&words, consider_incomplete, skip_start)
    }

    fn estimate_future_cost(&self, _rule: &Rule, state: Option<&DPState>) -> f64 {
        let Some(DPState::Ngram(state)) = state else {
            return 0.0;
        };
        let left = state.left();
        if left.is_empty() {
            return 0.0;
        }
        let skip_start = left[0] == self.vocab.start();
        self.score_chunk(left, true, skip_start)
    }
}
