//! The n-gram language-model interface and an in-memory backoff model.

use std::collections::HashMap;

use cubeprune_core::Symbol;

/// A backoff n-gram language model.
///
/// All probabilities are log-probabilities (≤ 0); feature functions negate
/// them into costs. The model is assumed to be a proper backoff model:
/// presence of a high-order n-gram implies presence of its lower orders,
/// and presence of a backoff weight implies a stored probability.
pub trait NgramModel: Send + Sync {
    /// Highest n-gram order the model stores.
    fn order(&self) -> usize;

    /// Log-probability of the last word of `ngram` given the preceding
    /// words, backing off as needed.
    fn ngram_log_probability(&self, ngram: &[Symbol]) -> f64;

    /// Accumulated backoff weights owed when an equivalence-state marker
    /// is crossed.
    ///
    /// `ngram` is the current context buffer ending at the marker;
    /// `additional_backoff` is the number of words at the front of the
    /// buffer that fell outside the stored state and owe their backoff
    /// weights. Missing weights contribute zero.
    fn log_prob_of_backoff_state(&self, ngram: &[Symbol], additional_backoff: usize) -> f64;

    /// Log-probability of a word sequence, scoring positions
    /// `start_index..=len` (1-based) each with up to `order - 1` words of
    /// context to its left.
    fn sentence_log_probability(&self, words: &[Symbol], order: usize, start_index: usize) -> f64 {
        let mut probability = 0.0;
        for pos in start_index.max(1)..=words.len() {
            let begin = pos.saturating_sub(order);
            probability += self.ngram_log_probability(&words[begin..pos]);
        }
        probability
    }
}

/// An explicit-table backoff model.
///
/// Holds log-probabilities and log backoff weights in hash maps, ARPA
/// style. Suitable for tests and small decodes; a production model would
/// sit behind the same trait.
#[derive(Debug)]
pub struct MapNgramModel {
    order: usize,
    probabilities: HashMap<Vec<Symbol>, f64>,
    backoff_weights: HashMap<Vec<Symbol>, f64>,
    unknown_log_prob: f64,
}

impl MapNgramModel {
    /// Creates an empty model of the given order.
    pub fn new(order: usize) -> Self {
        MapNgramModel {
            order,
            probabilities: HashMap::new(),
            backoff_weights: HashMap::new(),
            unknown_log_prob: -10.0,
        }
    }

    /// Sets the floor log-probability for unseen unigrams.
    pub fn with_unknown_log_prob(mut self, log_prob: f64) -> Self {
        self.unknown_log_prob = log_prob;
        self
    }

    /// Stores the log-probability of an n-gram.
    pub fn insert_ngram(&mut self, ngram: &[Symbol], log_prob: f64) {
        self.probabilities.insert(ngram.to_vec(), log_prob);
    }

    /// Stores the log backoff weight of a context.
    pub fn insert_backoff(&mut self, context: &[Symbol], log_weight: f64) {
        self.backoff_weights.insert(context.to_vec(), log_weight);
    }

    fn backoff_weight(&self, context: &[Symbol]) -> f64 {
        self.backoff_weights.get(context).copied().unwrap_or(0.0)
    }
}

impl NgramModel for MapNgramModel {
    fn order(&self) -> usize {
        self.order
    }

    fn ngram_log_probability(&self, ngram: &[Symbol]) -> f64 {
        if ngram.is_empty() {
            return 0.0;
        }
        if let Some(&log_prob) = self.probabilities.get(ngram) {
            return log_prob;
        }
        if ngram.len() == 1 {
            return self.unknown_log_prob;
        }
        // Back off: charge the context's weight and drop the oldest word.
        self.backoff_weight(&ngram[..ngram.len() - 1]) + self.ngram_log_probability(&ngram[1..])
    }

    fn log_prob_of_backoff_state(&self, ngram: &[Symbol], additional_backoff: usize) -> f64 {
        if ngram.is_empty() {
            return 0.0;
        }
        // The marker sits at the end of the buffer; the contexts owing
        // weights are the suffixes that include the additional words.
        let context = &ngram[..ngram.len() - 1];
        let mut total = 0.0;
        for i in 0..additional_backoff.min(context.len()) {
            total += self.backoff_weight(&context[i..]);
        }
        total
    }
}
