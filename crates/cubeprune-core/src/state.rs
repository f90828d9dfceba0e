//! Dynamic-programming state attached to hypergraph nodes.
//!
//! Each stateful feature function produces one opaque state value per
//! combination; nodes carry them in a small per-feature map. State is
//! written once when the node result is built and never mutated.

use smallvec::SmallVec;

use crate::error::{CoreError, Result};
use crate::symbol::Symbol;

/// Identity of a feature function within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureId(pub u32);

/// Boundary words, capped at `order - 1` per side.
pub type BoundaryWords = SmallVec<[Symbol; 4]>;

/// Boundary-word state for the n-gram language-model feature.
///
/// `left` holds the unresolved context at the start of the node's yield,
/// `right` the context its successors will score against. The two sides
/// always have equal length; a mismatch means the state was corrupted
/// upstream and scoring must abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramDPState {
    left: BoundaryWords,
    right: BoundaryWords,
}

impl NgramDPState {
    /// Creates a boundary state from the two word sequences.
    pub fn new(left: BoundaryWords, right: BoundaryWords) -> Self {
        NgramDPState { left, right }
    }

    /// Left boundary words.
    #[inline]
    pub fn left(&self) -> &[Symbol] {
        &self.left
    }

    /// Right boundary words.
    #[inline]
    pub fn right(&self) -> &[Symbol] {
        &self.right
    }

    /// Checks the equal-length invariant.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvariantViolation`] on mismatched sides.
    pub fn check_balanced(&self) -> Result<()> {
        if self.left.len() != self.right.len() {
            return Err(CoreError::InvariantViolation(format!(
                "left and right boundary contexts have unequal lengths ({} vs {})",
                self.left.len(),
                self.right.len()
            )));
        }
        Ok(())
    }
}

/// Opaque per-feature state, tagged by the producing feature kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DPState {
    /// Boundary-word state of the n-gram language model.
    Ngram(NgramDPState),
}

impl DPState {
    /// Returns the n-gram variant, or an invariant error if the entry
    /// under this feature id holds a different kind of state.
    pub fn as_ngram(&self) -> Result<&NgramDPState> {
        match self {
            DPState::Ngram(state) => Ok(state),
        }
    }
}

/// Per-node map from feature identity to its state.
///
/// Registries hold a handful of features, so this is a flat sorted-insert
/// list rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSet {
    entries: SmallVec<[(FeatureId, DPState); 2]>,
}

impl StateSet {
    /// Creates an empty state set.
    pub fn new() -> Self {
        StateSet::default()
    }

    /// Inserts or replaces the state for a feature.
    pub fn insert(&mut self, feature: FeatureId, state: DPState) {
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == feature) {
            entry.1 = state;
        } else {
            self.entries.push((feature, state));
        }
    }

    /// Looks up the state produced by a feature, if any.
    pub fn get(&self, feature: FeatureId) -> Option<&DPState> {
        self.entries
            .iter()
            .find(|(id, _)| *id == feature)
            .map(|(_, state)| state)
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no feature stored state.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(feature, state)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, &DPState)> {
        self.entries.iter().map(|(id, state)| (*id, state))
    }
}
