//! The chart-cell interface the combiner proposes into.
//!
//! The combiner never admits or evicts nodes itself; it submits every
//! explored combination and reads back the cell's live cutoff. [`BeamCell`]
//! is a concrete cell with a simple beam-retention policy, enough to stand
//! in for a full chart.

use std::sync::Arc;

use cubeprune_core::{HGNode, NodeArena, Result, Rule, SourcePath, Span, SuperNode, Symbol};
use cubeprune_scoring::NodeResult;

/// One cell of the chart: all derivations of one (span, symbol).
pub trait ChartCell {
    /// Submits a scored combination. The cell owns retention/eviction and
    /// may tighten its pruning cutoff as a side effect.
    fn add_hyper_edge(
        &mut self,
        result: NodeResult,
        rule: Arc<Rule>,
        span: Span,
        antecedents: &[cubeprune_core::NodeId],
        source_path: &SourcePath,
    );

    /// The cell's live pruning cutoff: best expected total cost submitted
    /// so far, `f64::INFINITY` while empty. Monotonically tightening over
    /// one combine call; callers must re-query after every submission.
    fn current_best_cost(&self) -> f64;
}

/// A retained submission, before node packing.
#[derive(Debug, Clone)]
pub struct CellEntry {
    /// The priced combination, with its merged states.
    pub result: NodeResult,
    /// The applied rule.
    pub rule: Arc<Rule>,
    /// Antecedent handles, empty for axioms.
    pub antecedents: Vec<cubeprune_core::NodeId>,
    /// Source-side evidence.
    pub source_path: SourcePath,
}

/// A cell retaining at most `beam_size` cheapest submissions.
#[derive(Debug)]
pub struct BeamCell {
    span: Span,
    symbol: Symbol,
    beam_size: Option<usize>,
    /// Ascending by expected total cost.
    entries: Vec<CellEntry>,
}

impl BeamCell {
    /// Creates a cell for one (span, symbol) bucket.
    pub fn new(span: Span, symbol: Symbol, beam_size: Option<usize>) -> Self {
        BeamCell {
            span,
            symbol,
            beam_size,
            entries: Vec::new(),
        }
    }

    /// The cell's span.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The cell's grammar symbol.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Retained entries, ascending by expected total cost.
    pub fn entries(&self) -> &[CellEntry] {
        &self.entries
    }

    /// Packs the retained entries into arena nodes and returns the
    /// cost-sorted super-node for enclosing spans.
    ///
    /// Every entry becomes its own node; equivalence-class merging by
    /// state signature is the full chart's concern.
    pub fn finalize(self, arena: &mut NodeArena) -> Result<SuperNode> {
        let mut ids = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let inner_cost = entry.result.inner_cost();
            let states = entry.result.into_states();
            let mut node = HGNode::new(self.span, self.symbol, inner_cost, states);
            node.add_edge(cubeprune_core::HyperEdge::new(
                entry.rule,
                entry.antecedents,
                inner_cost,
                entry.source_path,
            ));
            ids.push(arena.push(node));
        }
        SuperNode::new(self.span, self.symbol, ids, arena)
    }
}

impl ChartCell for BeamCell {
    fn add_hyper_edge(
        &mut self,
        result: NodeResult,
        rule: Arc<Rule>,
        span: Span,
        antecedents: &[cubeprune_core::NodeId],
        source_path: &SourcePath,
    ) {
        debug_assert_eq!(span, self.span);
        let cost = result.expected_total_cost();
        let at = self
            .entries
            .partition_point(|e| e.result.expected_total_cost() <= cost);
        self.entries.insert(
            at,
            CellEntry {
                result,
                rule,
                antecedents: antecedents.to_vec(),
                source_path: *source_path,
            },
        );
        if let Some(beam) = self.beam_size {
            self.entries.truncate(beam);
        }
    }

    fn current_best_cost(&self) -> f64 {
        self.entries
            .first()
            .map(|e| e.result.expected_total_cost())
            .unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{axiom_result, search_fixture};

    #[test]
    fn test_cutoff_tightens_with_submissions() {
        let fx = search_fixture();
        let mut cell = BeamCell::new(Span::new(0, 3), fx.nt, None);
        assert_eq!(cell.current_best_cost(), f64::INFINITY);

        let (rule_a, result_a) = axiom_result(&fx, &["the", "cat", "sat"], 2.0);
        cell.add_hyper_edge(
            result_a,
            rule_a,
            Span::new(0, 3),
            &[],
            &SourcePath::free(),
        );
        let first = cell.current_best_cost();
        assert!(first.is_finite());

        let (rule_b, result_b) = axiom_result(&fx, &["the", "cat", "sat"], 0.0);
        cell.add_hyper_edge(
            result_b,
            rule_b,
            Span::new(0, 3),
            &[],
            &SourcePath::free(),
        );
        assert!(cell.current_best_cost() < first);
    }

    #[test]
    fn test_beam_evicts_worst() {
        let fx = search_fixture();
        let mut cell = BeamCell::new(Span::new(0, 3), fx.nt, Some(2));
        for baseline in [3.0, 1.0, 2.0, 0.5] {
            let (rule, result) = axiom_result(&fx, &["the", "cat", "sat"], baseline);
            cell.add_hyper_edge(result, rule, Span::new(0, 3), &[], &SourcePath::free());
        }
        assert_eq!(cell.entries().len(), 2);
        let costs: Vec<f64> = cell
            .entries()
            .iter()
            .map(|e| e.result.expected_total_cost())
            .collect();
        assert!(costs[0] <= costs[1]);
        // The two cheapest baselines (0.5, 1.0) survive.
        assert!((costs[1] - costs[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_builds_sorted_super_node() {
        let fx = search_fixture();
        let mut cell = BeamCell::new(Span::new(0, 3), fx.nt, None);
        for baseline in [2.0, 0.0] {
            let (rule, result) = axiom_result(&fx, &["the", "cat", "sat"], baseline);
            cell.add_hyper_edge(result, rule, Span::new(0, 3), &[], &SourcePath::free());
        }
        let mut arena = cubeprune_core::NodeArena::new();
        let sn = cell.finalize(&mut arena).unwrap();
        assert_eq!(sn.len(), 2);
        let costs: Vec<f64> = sn
            .nodes()
            .iter()
            .map(|&id| arena.get(id).unwrap().inside_cost())
            .collect();
        assert!(costs[0] <= costs[1]);
    }
}
