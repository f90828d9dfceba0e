//! Symbol interning and the shared vocabulary.
//!
//! The vocabulary owns the sentence-boundary and equivalence-state marker
//! symbols that the n-gram feature relies on. It is built once and shared
//! by reference (`Arc<Vocabulary>`); there are no process-wide ids.

use std::collections::HashMap;

/// An interned terminal symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Returns the raw id.
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

/// String ↔ id table for terminal symbols.
///
/// Construction reserves four distinguished symbols:
/// - `<s>` / `</s>` — sentence start and stop markers
/// - `<bo>` — a left-boundary position whose backoff weight was already
///   charged by an inner combination
/// - `<rnull>` — a right-boundary position with no usable context
#[derive(Debug)]
pub struct Vocabulary {
    by_name: HashMap<String, Symbol>,
    names: Vec<String>,
    start: Symbol,
    stop: Symbol,
    backoff_marker: Symbol,
    null_right_marker: Symbol,
}

impl Vocabulary {
    const START: &'static str = "<s>";
    const STOP: &'static str = "</s>";
    const BACKOFF_MARKER: &'static str = "<bo>";
    const NULL_RIGHT_MARKER: &'static str = "<rnull>";

    /// Creates a vocabulary containing only the reserved markers.
    pub fn new() -> Self {
        let mut vocab = Vocabulary {
            by_name: HashMap::new(),
            names: Vec::new(),
            start: Symbol(0),
            stop: Symbol(0),
            backoff_marker: Symbol(0),
            null_right_marker: Symbol(0),
        };
        vocab.start = vocab.intern(Self::START);
        vocab.stop = vocab.intern(Self::STOP);
        vocab.backoff_marker = vocab.intern(Self::BACKOFF_MARKER);
        vocab.null_right_marker = vocab.intern(Self::NULL_RIGHT_MARKER);
        vocab
    }

    /// Interns a terminal, returning its symbol.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.by_name.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.by_name.insert(name.to_owned(), sym);
        sym
    }

    /// Looks up a terminal without interning.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.by_name.get(name).copied()
    }

    /// Resolves a symbol back to its string.
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.names.get(sym.0 as usize).map(String::as_str)
    }

    /// Number of interned symbols, markers included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether the vocabulary holds only the reserved markers.
    pub fn is_empty(&self) -> bool {
        self.names.len() <= 4
    }

    /// Sentence start marker.
    #[inline]
    pub fn start(&self) -> Symbol {
        self.start
    }

    /// Sentence stop marker.
    #[inline]
    pub fn stop(&self) -> Symbol {
        self.stop
    }

    /// Left-boundary backoff marker.
    #[inline]
    pub fn backoff_marker(&self) -> Symbol {
        self.backoff_marker
    }

    /// Right-boundary null-context marker.
    #[inline]
    pub fn null_right_marker(&self) -> Symbol {
        self.null_right_marker
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
