//! Grammar rules.
//!
//! A rule is immutable once built. Rule lists handed to the combiner are
//! expected to be sorted ascending by baseline cost; the combiner's
//! best-first ordering depends on index 0 being the cheapest rule.

use crate::error::{CoreError, Result};
use crate::symbol::Symbol;

/// One token of a rule's target side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetToken {
    /// A terminal word.
    Terminal(Symbol),
    /// A reference to the antecedent filling nonterminal slot `k`.
    NonTerminal(usize),
}

/// A synchronous grammar production.
#[derive(Debug, Clone)]
pub struct Rule {
    lhs: Symbol,
    source: Vec<Symbol>,
    target: Vec<TargetToken>,
    arity: usize,
    baseline_cost: f64,
}

impl Rule {
    /// Builds a rule, validating its nonterminal slot references.
    ///
    /// Slots must cover exactly `0..arity`, each used once, where `arity`
    /// is the number of nonterminal tokens on the target side.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRule`] if a slot is repeated or out
    /// of range.
    pub fn new(
        lhs: Symbol,
        source: Vec<Symbol>,
        target: Vec<TargetToken>,
        baseline_cost: f64,
    ) -> Result<Self> {
        let arity = target
            .iter()
            .filter(|t| matches!(t, TargetToken::NonTerminal(_)))
            .count();
        let mut seen = vec![false; arity];
        for token in &target {
            if let TargetToken::NonTerminal(slot) = token {
                if *slot >= arity {
                    return Err(CoreError::MalformedRule(format!(
                        "slot {slot} out of range for arity {arity}"
                    )));
                }
                if seen[*slot] {
                    return Err(CoreError::MalformedRule(format!("slot {slot} used twice")));
                }
                seen[*slot] = true;
            }
        }
        Ok(Rule {
            lhs,
            source,
            target,
            arity,
            baseline_cost,
        })
    }

    /// Left-hand-side nonterminal symbol.
    #[inline]
    pub fn lhs(&self) -> Symbol {
        self.lhs
    }

    /// Source-side symbol sequence.
    #[inline]
    pub fn source(&self) -> &[Symbol] {
        &self.source
    }

    /// Target-side token sequence.
    #[inline]
    pub fn target(&self) -> &[TargetToken] {
        &self.target
    }

    /// Number of nonterminal slots.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Intrinsic cost of applying this rule, before any feature scoring.
    #[inline]
    pub fn baseline_cost(&self) -> f64 {
        self.baseline_cost
    }

    /// Number of terminal words on the target side.
    pub fn target_terminal_count(&self) -> usize {
        self.target
            .iter()
            .filter(|t| matches!(t, TargetToken::Terminal(_)))
            .count()
    }
}
