//! The combination result builder.
//!
//! One [`NodeResult`] prices one lattice point: a rule applied to a fixed
//! tuple of antecedent nodes. It folds every feature function's transition
//! cost into the inner cost, collects the merged per-feature states, and
//! adds the heuristic forward estimates to form the expected total cost
//! the combiner orders candidates by.

use cubeprune_core::{NodeArena, NodeId, Result, Rule, SourcePath, Span, StateSet};

use crate::feature::FeatureRegistry;

/// A scored, stateful candidate combination.
#[derive(Debug, Clone)]
pub struct NodeResult {
    inner_cost: f64,
    expected_total_cost: f64,
    states: StateSet,
}

impl NodeResult {
    /// Prices `rule` applied over `antecedents` (empty for axioms).
    ///
    /// `inner_cost` is the rule baseline plus antecedent inside costs plus
    /// every weighted transition cost; `expected_total_cost` additionally
    /// folds in the weighted forward estimates over the merged states,
    /// which are heuristic only and never part of the inner cost.
    ///
    /// # Errors
    ///
    /// Propagates feature-evaluation failures (dangling handles, corrupted
    /// antecedent state); the candidate must then be dropped.
    pub fn compute(
        features: &FeatureRegistry,
        rule: &Rule,
        antecedents: &[NodeId],
        arena: &NodeArena,
        span: Span,
        source_path: &SourcePath,
    ) -> Result<Self> {
        let mut inner_cost = rule.baseline_cost();
        for &id in antecedents {
            inner_cost += arena.get(id)?.inside_cost();
        }

        let mut states = StateSet::new();
        for ff in features.iter() {
            let transition = ff.transition(rule, antecedents, arena, span, source_path)?;
            inner_cost += ff.weight() * transition.cost;
            if let Some(state) = transition.state {
                states.insert(ff.feature_id(), state);
            }
        }

        let mut expected_total_cost = inner_cost;
        for ff in features.iter() {
            expected_total_cost +=
                ff.weight() * ff.estimate_future_cost(rule, states.get(ff.feature_id()));
        }

        Ok(NodeResult {
            inner_cost,
            expected_total_cost,
            states,
        })
    }

    /// Weighted sum of every feature's goal-closing cost for `node`.
    pub fn compute_final(
        features: &FeatureRegistry,
        node: NodeId,
        arena: &NodeArena,
        span: Span,
        source_path: &SourcePath,
    ) -> Result<f64> {
        let mut cost = 0.0;
        for ff in features.iter() {
            cost += ff.weight() * ff.final_transition(node, arena, span, source_path)?;
        }
        Ok(cost)
    }

    /// Rule baseline + antecedent inside costs + weighted transitions.
    #[inline]
    pub fn inner_cost(&self) -> f64 {
        self.inner_cost
    }

    /// Inner cost plus the heuristic forward estimates; the search's
    /// ordering key.
    #[inline]
    pub fn expected_total_cost(&self) -> f64 {
        self.expected_total_cost
    }

    /// Merged per-feature states for the node this result would build.
    #[inline]
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Consumes the result into its state set.
    pub fn into_states(self) -> StateSet {
        self.states
    }
}
