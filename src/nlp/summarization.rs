// Extractive summarization: frequency-scored sentence selection.
use serde::Serialize;

use crate::error::Result;
use crate::nlp::frequency::{score_sentences, word_frequencies};
use crate::nlp::normalize::{sentences, Sentence, Stopwords};
use crate::nlp::phrases::noun_phrases;

/// Documents shorter than this come back unchanged, flagged.
pub const MIN_SUMMARY_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub summary: String,
    pub summary_ratio: f64,
    pub original_words: usize,
    pub summary_words: usize,
    pub original_sentences: usize,
    pub sentences_selected: usize,
    pub compression_ratio: f64,
    pub below_minimum_length: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletSummary {
    pub points: Vec<String>,
    pub num_points: usize,
    pub original_sentences: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordSummary {
    pub keywords: Vec<String>,
    pub key_phrases: Vec<String>,
    pub word_frequencies: Vec<(String, f64)>,
    pub total_unique_words: usize,
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn passthrough(text: &str, sentence_count: usize, below_minimum: bool) -> SummaryResult {
    SummaryResult {
        summary: text.to_string(),
        summary_ratio: 1.0,
        original_words: word_count(text),
        summary_words: word_count(text),
        original_sentences: sentence_count,
        sentences_selected: sentence_count.max(1),
        compression_ratio: 1.0,
        below_minimum_length: below_minimum,
    }
}

/// Selects the highest-scoring sentences, then restores document order.
///
/// Ties resolve to document order (stable sort). Selections for
/// different ratios are each top-k by score, so a smaller ratio's
/// summary is not necessarily a subset of a larger one's.
fn select_top(
    sents: &[Sentence],
    scores: &std::collections::HashMap<usize, f64>,
    count: usize,
) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = sents
        .iter()
        .map(|s| (s.index, scores.get(&s.index).copied().unwrap_or(0.0)))
        .collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut selected: Vec<usize> = indexed.into_iter().take(count).map(|(i, _)| i).collect();
    selected.sort_unstable();
    selected
}

/// Extractive summary at the requested ratio of sentences.
pub fn extractive_summarize(text: &str, summary_ratio: f64) -> Result<SummaryResult> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_SUMMARY_CHARS {
        return Ok(passthrough(text, sentences(text).len(), true));
    }

    let sents = sentences(text);
    if sents.len() <= 2 {
        return Ok(passthrough(text, sents.len(), false));
    }

    let stopwords = Stopwords::new();
    let table = word_frequencies(text, &stopwords);
    let scores = score_sentences(&sents, &table, &stopwords);

    let count = ((sents.len() as f64 * summary_ratio) as usize).max(1);
    let selected = select_top(&sents, &scores, count);

    let summary = selected
        .iter()
        .map(|&i| sents[i].text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(SummaryResult {
        original_words: word_count(text),
        summary_words: word_count(&summary),
        original_sentences: sents.len(),
        sentences_selected: count,
        compression_ratio: summary.len() as f64 / text.len() as f64,
        summary_ratio,
        summary,
        below_minimum_length: false,
    })
}

/// Bullet-point summary capped at `max_points`.
///
/// A document with no more sentences than `max_points` is passed
/// through verbatim, one bullet per sentence, with no scoring.
pub fn bullet_point_summary(text: &str, max_points: usize) -> Result<BulletSummary> {
    let sents = sentences(text);

    if sents.len() <= max_points {
        return Ok(BulletSummary {
            points: sents.iter().map(|s| s.text.clone()).collect(),
            num_points: sents.len(),
            original_sentences: sents.len(),
        });
    }

    let stopwords = Stopwords::new();
    let table = word_frequencies(text, &stopwords);
    let scores = score_sentences(&sents, &table, &stopwords);
    let selected = select_top(&sents, &scores, max_points);

    Ok(BulletSummary {
        points: selected.iter().map(|&i| sents[i].text.clone()).collect(),
        num_points: selected.len(),
        original_sentences: sents.len(),
    })
}

/// Top keywords by normalized frequency plus the top noun phrases.
pub fn keyword_summary(text: &str, num_keywords: usize) -> Result<KeywordSummary> {
    let stopwords = Stopwords::new();
    let table = word_frequencies(text, &stopwords);

    let ranked = table.ranked();
    let top: Vec<(String, f64)> = ranked.into_iter().take(num_keywords).collect();

    // Noun phrases ranked by how often they recur, first seen first.
    let phrases = noun_phrases(text, &stopwords);
    let lower = text.to_lowercase();
    let mut phrase_counts: Vec<(String, usize)> = phrases
        .into_iter()
        .map(|p| {
            let count = lower.matches(p.as_str()).count();
            (p, count)
        })
        .collect();
    phrase_counts.sort_by(|a, b| b.1.cmp(&a.1));
    let key_phrases: Vec<String> = phrase_counts.into_iter().take(5).map(|(p, _)| p).collect();

    Ok(KeywordSummary {
        keywords: top.iter().map(|(w, _)| w.clone()).collect(),
        total_unique_words: table.len(),
        word_frequencies: top,
        key_phrases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "Rust is a systems programming language focused on safety. \
        Rust achieves memory safety without garbage collection. \
        The borrow checker enforces ownership rules at compile time. \
        Many companies adopt Rust for performance critical services. \
        Rust tooling includes a package manager and a formatter. \
        The community publishes thousands of packages every month.";

    #[test]
    fn test_short_text_passthrough() {
        let result = extractive_summarize("Too short.", 0.3).unwrap();
        assert_eq!(result.summary, "Too short.");
        assert_eq!(result.summary_ratio, 1.0);
        assert!(result.below_minimum_length);
    }

    #[test]
    fn test_two_sentence_passthrough() {
        let text = "This first sentence is long enough to pass the minimum. And this second one too.";
        let result = extractive_summarize(text, 0.3).unwrap();
        assert_eq!(result.summary, text);
        assert_eq!(result.summary_ratio, 1.0);
        assert!(!result.below_minimum_length);
    }

    #[test]
    fn test_summary_selects_subset_in_document_order() {
        let result = extractive_summarize(ARTICLE, 0.3).unwrap();
        assert_eq!(result.original_sentences, 6);
        assert_eq!(result.sentences_selected, 1);
        assert!(ARTICLE.contains(&result.summary));
        assert!(result.compression_ratio < 1.0);
    }

    #[test]
    fn test_full_ratio_selects_everything() {
        let result = extractive_summarize(ARTICLE, 1.0).unwrap();
        assert_eq!(result.sentences_selected, result.original_sentences);
        assert!((result.compression_ratio - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_selection_count_floors_with_minimum_one() {
        let result = extractive_summarize(ARTICLE, 0.1).unwrap();
        // floor(6 * 0.1) = 0, raised to the minimum of 1
        assert_eq!(result.sentences_selected, 1);
    }

    #[test]
    fn test_bullet_short_circuit_keeps_every_sentence() {
        let text = "First point here. Second point there. Third point anywhere.";
        let result = bullet_point_summary(text, 5).unwrap();
        assert_eq!(result.num_points, 3);
        assert_eq!(result.points[0], "First point here.");
    }

    #[test]
    fn test_bullet_selection_respects_cap() {
        let result = bullet_point_summary(ARTICLE, 3).unwrap();
        assert_eq!(result.num_points, 3);
        assert_eq!(result.original_sentences, 6);
    }

    #[test]
    fn test_keyword_summary_ranks_by_frequency() {
        let result = keyword_summary(ARTICLE, 10).unwrap();
        assert_eq!(result.keywords.first().map(String::as_str), Some("rust"));
        assert!(result.word_frequencies[0].1 == 1.0);
        assert!(result.total_unique_words >= result.keywords.len());
    }
}
