//! The feature-function contract.
//!
//! Every scoring module, stateless or stateful, implements
//! [`FeatureFunction`]; the result builder iterates a [`FeatureRegistry`]
//! uniformly. Costs are negative log-probabilities (lower is better);
//! weights are applied by the result builder, not here.

use cubeprune_core::{DPState, FeatureId, NodeArena, NodeId, Result, Rule, SourcePath, Span};

/// Output of one incremental transition.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Unweighted incremental cost of this combination.
    pub cost: f64,
    /// Merged state for the new node, for stateful functions.
    pub state: Option<DPState>,
}

impl Transition {
    /// A stateless transition carrying only a cost.
    pub fn stateless(cost: f64) -> Self {
        Transition { cost, state: None }
    }

    /// A stateful transition carrying a cost and the merged state.
    pub fn stateful(cost: f64, state: DPState) -> Self {
        Transition {
            cost,
            state: Some(state),
        }
    }
}

/// A cost model priced into every candidate combination.
///
/// Implementations must not mutate shared rule or node data; all outputs
/// flow through the returned [`Transition`].
pub trait FeatureFunction: Send + Sync {
    /// Identity of this function within its registry; keys the state a
    /// stateful function stores on nodes.
    fn feature_id(&self) -> FeatureId;

    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Weight multiplied into this function's costs by the result builder.
    fn weight(&self) -> f64;

    /// Returns whether this function produces per-node state.
    fn is_stateful(&self) -> bool {
        false
    }

    /// Incremental cost of applying `rule` over `antecedents`, plus the
    /// merged state for stateful functions.
    ///
    /// # Errors
    ///
    /// Fails on invariant violations in antecedent state; the candidate
    /// must then be abandoned, never scored with corrupted context.
    fn transition(
        &self,
        rule: &Rule,
        antecedents: &[NodeId],
        arena: &NodeArena,
        span: Span,
        source_path: &SourcePath,
    ) -> Result<Transition>;

    /// Cost of closing out `node` at the goal symbol (e.g. sentence
    /// boundary effects). Evaluated once per completed derivation.
    fn final_transition(
        &self,
        node: NodeId,
        arena: &NodeArena,
        span: Span,
        source_path: &SourcePath,
    ) -> Result<f64>;

    /// Cheap context-free estimate of a rule's contribution, used to rank
    /// rules before antecedents are known.
    fn estimate(&self, rule: &Rule) -> f64;

    /// Heuristic estimate of remaining cost given a merged state.
    ///
    /// Used only to order and prune the search frontier. It is not a
    /// proven bound; callers assume it never underestimates by more than
    /// the configured fuzz margins.
    fn estimate_future_cost(&self, rule: &Rule, state: Option<&DPState>) -> f64;
}

/// An ordered sequence of feature functions.
#[derive(Default)]
pub struct FeatureRegistry {
    functions: Vec<Box<dyn FeatureFunction>>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        FeatureRegistry::default()
    }

    /// Appends a feature function.
    pub fn push(&mut self, function: Box<dyn FeatureFunction>) {
        self.functions.push(function);
    }

    /// Builder-style append.
    pub fn with(mut self, function: Box<dyn FeatureFunction>) -> Self {
        self.push(function);
        self
    }

    /// Iterates the registered functions in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FeatureFunction> {
        self.functions.iter().map(Box::as_ref)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.functions.iter().map(|ff| ff.name()))
            .finish()
    }
}
