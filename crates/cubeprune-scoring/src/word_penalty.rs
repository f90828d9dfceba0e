//! Stateless per-word penalty.
//!
//! Charges a constant for every target terminal a rule emits, balancing
//! the language model's preference for short output. Also the simplest
//! exercise of the feature contract: no state, exact estimates.

use cubeprune_core::{DPState, FeatureId, NodeArena, NodeId, Result, Rule, SourcePath, Span};

use crate::feature::{FeatureFunction, Transition};

/// Per-word charge, in the same log domain as the language model.
const WORD_COST: f64 = std::f64::consts::LOG10_E;

/// Counts target terminals into a fixed per-word cost.
#[derive(Debug, Clone)]
pub struct WordPenaltyFeature {
    id: FeatureId,
    weight: f64,
}

impl WordPenaltyFeature {
    /// Creates the feature with the given registry identity and weight.
    pub fn new(id: FeatureId, weight: f64) -> Self {
        WordPenaltyFeature { id, weight }
    }

    fn penalty(rule: &Rule) -> f64 {
        WORD_COST * rule.target_terminal_count() as f64
    }
}

impl FeatureFunction for WordPenaltyFeature {
    fn feature_id(&self) -> FeatureId {
        self.id
    }

    fn name(&self) -> &str {
        "word-penalty"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn transition(
        &self,
        rule: &Rule,
        _antecedents: &[NodeId],
        _arena: &NodeArena,
        _span: Span,
        _source_path: &SourcePath,
    ) -> Result<Transition> {
        Ok(Transition::stateless(Self::penalty(rule)))
    }

    fn final_transition(
        &self,
        _node: NodeId,
        _arena: &NodeArena,
        _span: Span,
        _source_path: &SourcePath,
    ) -> Result<f64> {
        Ok(0.0)
    }

    fn estimate(&self, rule: &Rule) -> f64 {
        Self::penalty(rule)
    }

    fn estimate_future_cost(&self, _rule: &Rule, _state: Option<&DPState>) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::trigram_fixture;

    #[test]
    fn test_penalty_counts_terminals_only() {
        let fx = trigram_fixture();
        let rule = fx.rule_tokens(
            vec![
                cubeprune_core::TargetToken::NonTerminal(0),
                cubeprune_core::TargetToken::Terminal(fx.sym("the")),
                cubeprune_core::TargetToken::Terminal(fx.sym("cat")),
            ],
            0.0,
        );
        let ff = WordPenaltyFeature::new(FeatureId(3), 1.0);
        let arena = NodeArena::new();
        let tr = ff
            .transition(&rule, &[], &arena, Span::new(0, 2), &SourcePath::free())
            .unwrap();
        assert!((tr.cost - 2.0 * WORD_COST).abs() < 1e-12);
        assert!(tr.state.is_none());
        assert_eq!(ff.estimate(&rule), tr.cost);
    }
}
