//! Cubeprune Core - shared types for the decoder search core
//!
//! This crate provides the fundamental abstractions the search engine and
//! the scoring layer build on:
//! - Symbol interning and the shared vocabulary
//! - Grammar rules
//! - Hypergraph nodes, arenas, and super-nodes
//! - Dynamic-programming state carried by nodes

pub mod error;
pub mod hypergraph;
pub mod rule;
pub mod state;
pub mod symbol;

pub use error::{CoreError, Result};
pub use hypergraph::{HGNode, HyperEdge, NodeArena, NodeId, SourcePath, Span, SuperNode};
pub use rule::{Rule, TargetToken};
pub use state::{BoundaryWords, DPState, FeatureId, NgramDPState, StateSet};
pub use symbol::{Symbol, Vocabulary};
