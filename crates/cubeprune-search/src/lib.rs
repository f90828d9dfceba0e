//! Cubeprune search engine
//!
//! This crate drives the decoder's chart search:
//! - The cube-pruning combiner and its axiom path
//! - The chart-cell interface the combiner proposes into, plus a
//!   beam-retention cell
//! - Search statistics for pruning diagnostics

pub mod cell;
pub mod combine;
pub mod statistics;

#[cfg(test)]
mod test_utils;

pub use cell::{BeamCell, CellEntry, ChartCell};
pub use combine::CubePruneCombiner;
pub use statistics::CombineStats;
