//! The cube-pruning combiner.
//!
//! Enumerates rule × antecedent combinations for one cell in
//! non-decreasing expected-total-cost order without materializing the full
//! cross product. A rank vector of length `1 + arity` identifies one
//! lattice point: element 0 indexes the cost-sorted rule list, element k
//! indexes super-node k−1's cost-sorted node list. The frontier is a
//! min-heap; a hash set of rank vectors guarantees each point is expanded
//! at most once.
//!
//! Every popped candidate is submitted to the cell — there is no top-K
//! cap. Bounding comes from two tolerances: `fuzz1` stops the whole search
//! once a popped candidate exceeds the cell's live best cost by more than
//! the margin, and `fuzz2` refuses frontier admission to neighbors beyond
//! the looser margin. Because submissions can tighten the cell's cutoff,
//! the cutoff is re-queried after every submission, never cached.
//!
//! The expected total cost folds in a heuristic forward estimate while the
//! cell's cutoff is a true cost; the comparison is only as sound as the
//! features' estimates are within the fuzz margins. That assumption is
//! inherited, not enforced.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use cubeprune_config::SearchConfig;
use cubeprune_core::{NodeArena, NodeId, Result, Rule, SourcePath, Span, SuperNode};
use cubeprune_scoring::{FeatureRegistry, NodeResult};

use crate::cell::ChartCell;
use crate::statistics::CombineStats;

/// Rank vector selecting one rule and one antecedent node per slot.
/// Components are 1-based, matching the "all ones" seed.
type RankVector = SmallVec<[u32; 5]>;

/// One frontier entry: a materialized lattice point.
struct Candidate {
    ranks: RankVector,
    rule: Arc<Rule>,
    antecedents: Vec<NodeId>,
    result: NodeResult,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    /// Orders by expected total cost; ties are arbitrary.
    fn cmp(&self, other: &Self) -> Ordering {
        self.result
            .expected_total_cost()
            .total_cmp(&other.result.expected_total_cost())
    }
}

/// Lazy best-first combination of rules with antecedent super-nodes.
pub struct CubePruneCombiner {
    features: FeatureRegistry,
    fuzz1: f64,
    fuzz2: f64,
}

impl CubePruneCombiner {
    /// Creates a combiner with explicit tolerances.
    pub fn new(features: FeatureRegistry, fuzz1: f64, fuzz2: f64) -> Self {
        CubePruneCombiner {
            features,
            fuzz1,
            fuzz2,
        }
    }

    /// Creates a combiner from a search configuration section.
    pub fn from_config(features: FeatureRegistry, config: &SearchConfig) -> Self {
        Self::new(features, config.fuzz1, config.fuzz2)
    }

    /// The feature registry pricing every candidate.
    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    /// Applies every 0-arity rule directly; no search is needed.
    ///
    /// # Errors
    ///
    /// Propagates feature-evaluation failures.
    pub fn add_axioms<C: ChartCell>(
        &self,
        cell: &mut C,
        span: Span,
        rules: &[Arc<Rule>],
        source_path: &SourcePath,
        arena: &NodeArena,
    ) -> Result<()> {
        for rule in rules {
            self.add_axiom(cell, span, rule, source_path, arena)?;
        }
        Ok(())
    }

    /// Applies one 0-arity rule, submitting it unconditionally.
    pub fn add_axiom<C: ChartCell>(
        &self,
        cell: &mut C,
        span: Span,
        rule: &Arc<Rule>,
        source_path: &SourcePath,
        arena: &NodeArena,
    ) -> Result<()> {
        let result = NodeResult::compute(&self.features, rule, &[], arena, span, source_path)?;
        cell.add_hyper_edge(result, Arc::clone(rule), span, &[], source_path);
        Ok(())
    }

    /// Runs the lattice search for one cell.
    ///
    /// `rules` must be sorted ascending by baseline cost and share one
    /// arity equal to `super_nodes.len()`; each super-node's node list is
    /// ascending by inside cost. Empty inputs produce no hyperedges and
    /// empty statistics.
    ///
    /// # Errors
    ///
    /// Propagates feature-evaluation failures; the cell keeps whatever was
    /// already submitted.
    pub fn combine<C: ChartCell>(
        &self,
        cell: &mut C,
        span: Span,
        super_nodes: &[SuperNode],
        rules: &[Arc<Rule>],
        source_path: &SourcePath,
        arena: &NodeArena,
    ) -> Result<CombineStats> {
        let mut stats = CombineStats::new();
        if rules.is_empty() || super_nodes.iter().any(SuperNode::is_empty) {
            return Ok(stats);
        }
        debug_assert!(rules
            .windows(2)
            .all(|w| w[0].baseline_cost() <= w[1].baseline_cost()));

        let mut frontier: BinaryHeap<std::cmp::Reverse<Candidate>> = BinaryHeap::new();
        let mut visited: HashSet<RankVector> = HashSet::new();

        // Seed: cheapest rule with the cheapest node per slot.
        let seed_ranks: RankVector = std::iter::repeat(1)
            .take(1 + super_nodes.len())
            .collect();
        let seed_rule = Arc::clone(&rules[0]);
        let seed_antecedents: Vec<NodeId> =
            super_nodes.iter().map(|sn| sn.nodes()[0]).collect();
        let seed_result = NodeResult::compute(
            &self.features,
            &seed_rule,
            &seed_antecedents,
            arena,
            span,
            source_path,
        )?;
        debug!(
            rules = rules.len(),
            slots = super_nodes.len(),
            seed_cost = seed_result.expected_total_cost(),
            "seeding cube-pruning frontier"
        );
        visited.insert(seed_ranks.clone());
        frontier.push(std::cmp::Reverse(Candidate {
            ranks: seed_ranks,
            rule: seed_rule,
            antecedents: seed_antecedents,
            result: seed_result,
        }));

        while let Some(std::cmp::Reverse(candidate)) = frontier.pop() {
            stats.popped += 1;
            let expected = candidate.result.expected_total_cost();
            trace!(ranks = ?candidate.ranks, expected, "popped lattice point");

            // Every pop is proposed; the cell owns admission and may
            // tighten its cutoff as a side effect.
            cell.add_hyper_edge(
                candidate.result,
                Arc::clone(&candidate.rule),
                span,
                &candidate.antecedents,
                source_path,
            );
            stats.submitted += 1;

            // Global stop: if the cheapest remaining point is already past
            // the margin, everything still queued is worse.
            let cutoff = cell.current_best_cost();
            if expected > cutoff + self.fuzz1 {
                stats.pruned_fuzz1 += frontier.len() as u64;
                debug!(
                    expected,
                    cutoff,
                    discarded = frontier.len(),
                    "global stop fired"
                );
                break;
            }

            for axis in 0..candidate.ranks.len() {
                let mut ranks = candidate.ranks.clone();
                ranks[axis] += 1;
                if visited.contains(&ranks) {
                    continue;
                }
                let index = ranks[axis] as usize;
                if axis == 0 {
                    if index > rules.len() {
                        continue;
                    }
                } else if index > super_nodes[axis - 1].len() {
                    continue;
                }

                let rule = if axis == 0 {
                    Arc::clone(&rules[index - 1])
                } else {
                    Arc::clone(&candidate.rule)
                };
                let mut antecedents = candidate.antecedents.clone();
                if axis > 0 {
                    antecedents[axis - 1] = super_nodes[axis - 1].nodes()[index - 1];
                }

                visited.insert(ranks.clone());
                stats.generated += 1;
                let result =
                    NodeResult::compute(&self.features, &rule, &antecedents, arena, span, source_path)?;

                if result.expected_total_cost() < cell.current_best_cost() + self.fuzz2 {
                    frontier.push(std::cmp::Reverse(Candidate {
                        ranks,
                        rule,
                        antecedents,
                        result,
                    }));
                } else {
                    stats.pruned_fuzz2 += 1;
                }
            }
        }

        debug!(
            popped = stats.popped,
            pruned_fuzz1 = stats.pruned_fuzz1,
            pruned_fuzz2 = stats.pruned_fuzz2,
            "combine finished"
        );
        Ok(stats)
    }
}
