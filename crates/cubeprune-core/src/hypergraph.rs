//! Hypergraph node storage.
//!
//! Nodes are shared across many hyperedges and cells, forming a DAG, so
//! they live in an arena and are referenced by [`NodeId`] handles. Cleanup
//! is a bulk arena teardown; no reference counting is involved.

use std::sync::Arc;

use crate::error::{CoreError, Result};
use crate::rule::Rule;
use crate::state::StateSet;
use crate::symbol::Symbol;

/// Handle of a node within a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Half-open input span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Creates a span over `[start, end)`.
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Width of the span in source words.
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Evidence of the source-side path a rule application covers.
///
/// Opaque to the search core; it only contributes a fixed path cost (e.g.
/// from a source lattice) that collaborators may fold into scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourcePath {
    cost: f64,
}

impl SourcePath {
    /// A path with no associated cost (plain-sentence input).
    pub fn free() -> Self {
        SourcePath { cost: 0.0 }
    }

    /// A path carrying the given cost.
    pub fn with_cost(cost: f64) -> Self {
        SourcePath { cost }
    }

    /// The path's cost contribution.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }
}

impl Default for SourcePath {
    fn default() -> Self {
        Self::free()
    }
}

/// One rule application over a fixed tuple of antecedent nodes.
#[derive(Debug, Clone)]
pub struct HyperEdge {
    rule: Arc<Rule>,
    antecedents: Vec<NodeId>,
    inner_cost: f64,
    source_path: SourcePath,
}

impl HyperEdge {
    /// Creates a hyperedge for `rule` over `antecedents`.
    pub fn new(
        rule: Arc<Rule>,
        antecedents: Vec<NodeId>,
        inner_cost: f64,
        source_path: SourcePath,
    ) -> Self {
        HyperEdge {
            rule,
            antecedents,
            inner_cost,
            source_path,
        }
    }

    /// The applied rule.
    #[inline]
    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    /// Antecedent node handles, one per nonterminal slot.
    #[inline]
    pub fn antecedents(&self) -> &[NodeId] {
        &self.antecedents
    }

    /// Best cost of the derivation this edge roots.
    #[inline]
    pub fn inner_cost(&self) -> f64 {
        self.inner_cost
    }

    /// Source-side evidence for this application.
    #[inline]
    pub fn source_path(&self) -> &SourcePath {
        &self.source_path
    }
}

/// A packed equivalence class of derivations sharing span, symbol, and
/// per-feature state signature.
#[derive(Debug, Clone)]
pub struct HGNode {
    span: Span,
    symbol: Symbol,
    inside_cost: f64,
    states: StateSet,
    edges: Vec<HyperEdge>,
}

impl HGNode {
    /// Creates a node with no incoming edges.
    pub fn new(span: Span, symbol: Symbol, inside_cost: f64, states: StateSet) -> Self {
        HGNode {
            span,
            symbol,
            inside_cost,
            states,
            edges: Vec::new(),
        }
    }

    /// The input span this node covers.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The grammar symbol heading this node.
    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Best known cost to derive this node.
    #[inline]
    pub fn inside_cost(&self) -> f64 {
        self.inside_cost
    }

    /// Per-feature dynamic-programming states.
    #[inline]
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Incoming hyperedges retained for this equivalence class.
    #[inline]
    pub fn edges(&self) -> &[HyperEdge] {
        &self.edges
    }

    /// Attaches an incoming hyperedge, tightening the inside cost if the
    /// edge improves on it.
    pub fn add_edge(&mut self, edge: HyperEdge) {
        if edge.inner_cost() < self.inside_cost {
            self.inside_cost = edge.inner_cost();
        }
        self.edges.push(edge);
    }
}

/// Bump-allocated node storage.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<HGNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena::default()
    }

    /// Stores a node, returning its handle.
    pub fn push(&mut self, node: HGNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Resolves a handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DanglingNode`] for handles from another arena.
    pub fn get(&self, id: NodeId) -> Result<&HGNode> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(CoreError::DanglingNode(id))
    }

    /// Resolves a handle mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut HGNode> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(CoreError::DanglingNode(id))
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Cost-sorted bucket of the nodes for one (span, symbol).
///
/// `nodes` is ascending by inside cost; index 0 is always the cheapest.
#[derive(Debug, Clone)]
pub struct SuperNode {
    span: Span,
    symbol: Symbol,
    nodes: Vec<NodeId>,
}

impl SuperNode {
    /// Builds a super-node, sorting the handles ascending by inside cost.
    pub fn new(span: Span, symbol: Symbol, mut nodes: Vec<NodeId>, arena: &NodeArena) -> Result<Self> {
        for &id in &nodes {
            arena.get(id)?;
        }
        nodes.sort_by(|&a, &b| {
            let ca = arena.get(a).map(HGNode::inside_cost).unwrap_or(f64::INFINITY);
            let cb = arena.get(b).map(HGNode::inside_cost).unwrap_or(f64::INFINITY);
            ca.total_cmp(&cb)
        });
        Ok(SuperNode {
            span,
            symbol,
            nodes,
        })
    }

    /// The bucket's span.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The bucket's grammar symbol.
    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Node handles, ascending by inside cost.
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes in the bucket.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the bucket has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
