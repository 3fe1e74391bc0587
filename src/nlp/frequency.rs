// Word-frequency scoring: the shared ranking signal for summaries.
use std::collections::HashMap;

use crate::nlp::normalize::{qualifying_tokens, Sentence, Stopwords};

/// Word frequencies normalized to [0, 1] by the maximum raw count.
///
/// Immutable after construction. When non-empty, the maximum value is
/// exactly 1.0.
#[derive(Debug, Clone, Default)]
pub struct WordFrequencyTable {
    freqs: HashMap<String, f64>,
    order: Vec<String>,
}

impl WordFrequencyTable {
    pub fn get(&self, word: &str) -> Option<f64> {
        self.freqs.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.freqs.values().cloned().fold(None, |acc, v| {
            Some(acc.map_or(v, |m: f64| m.max(v)))
        })
    }

    /// Words with their frequencies, ordered by descending frequency;
    /// ties keep first-occurrence order.
    pub fn ranked(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .order
            .iter()
            .map(|w| (w.clone(), self.freqs[w]))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        out
    }
}

/// Builds the normalized word-frequency table for a document.
///
/// Only alphabetic non-stop-word tokens count. With no qualifying
/// tokens the table is empty and every downstream score is 0.
pub fn word_frequencies(text: &str, stopwords: &Stopwords) -> WordFrequencyTable {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for word in qualifying_tokens(text, stopwords) {
        let entry = counts.entry(word.clone()).or_insert(0);
        if *entry == 0 {
            order.push(word);
        }
        *entry += 1;
    }

    let max = counts.values().max().copied().unwrap_or(0);
    if max == 0 {
        return WordFrequencyTable::default();
    }

    let freqs = counts
        .into_iter()
        .map(|(w, c)| (w, c as f64 / max as f64))
        .collect();

    WordFrequencyTable { freqs, order }
}

/// Scores each sentence by the sum of its qualifying tokens'
/// frequencies divided by the number of qualifying tokens.
///
/// Rewards sentences dense in high-frequency informative words while
/// normalizing for length. Sentences with no qualifying tokens score 0.
pub fn score_sentences(
    sentences: &[Sentence],
    table: &WordFrequencyTable,
    stopwords: &Stopwords,
) -> HashMap<usize, f64> {
    let mut scores = HashMap::new();

    for sentence in sentences {
        let words = qualifying_tokens(&sentence.text, stopwords);
        if words.is_empty() {
            scores.insert(sentence.index, 0.0);
            continue;
        }
        let sum: f64 = words.iter().filter_map(|w| table.get(w)).sum();
        scores.insert(sentence.index, sum / words.len() as f64);
    }

    scores
}
