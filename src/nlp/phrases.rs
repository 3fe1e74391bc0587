// Noun-phrase candidates without a tagger: capitalized spans plus
// runs of content words, bounded by the chunk-length config.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::normalize::{sentences, Stopwords};

static CAPITALIZED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").unwrap());

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[\w']+\b").unwrap());

/// Extracts lower-cased noun-phrase candidates.
///
/// Two sources, in document order: multi-word capitalized spans, then
/// per-sentence runs of consecutive alphabetic non-stop-word tokens
/// within the configured length bounds. De-duplicated, first seen wins.
#[derive(Debug, Clone)]
pub struct NounPhraseExtractor {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for NounPhraseExtractor {
    fn default() -> Self {
        Self {
            min_words: 2,
            max_words: 4,
        }
    }
}

impl NounPhraseExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, text: &str, stopwords: &Stopwords) -> Vec<String> {
        let mut phrases: Vec<String> = Vec::new();

        for m in CAPITALIZED_SPAN.find_iter(text) {
            push_unique(m.as_str().to_lowercase(), &mut phrases);
        }

        for sentence in sentences(text) {
            let words: Vec<String> = WORD
                .find_iter(&sentence.text)
                .map(|m| m.as_str().to_lowercase())
                .collect();

            let mut run: Vec<&str> = Vec::new();
            for word in &words {
                let content =
                    word.chars().all(|c| c.is_alphabetic()) && !stopwords.contains(word);
                if content {
                    run.push(word);
                } else {
                    self.flush_run(&mut run, &mut phrases);
                }
            }
            self.flush_run(&mut run, &mut phrases);
        }

        phrases
    }

    fn flush_run(&self, run: &mut Vec<&str>, phrases: &mut Vec<String>) {
        if run.len() >= self.min_words {
            let end = run.len().min(self.max_words);
            push_unique(run[..end].join(" "), phrases);
        }
        run.clear();
    }
}

fn push_unique(candidate: String, phrases: &mut Vec<String>) {
    if !phrases.contains(&candidate) {
        phrases.push(candidate);
    }
}

/// Noun phrases with the default length bounds.
pub fn noun_phrases(text: &str, stopwords: &Stopwords) -> Vec<String> {
    NounPhraseExtractor::new().extract(text, stopwords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_spans() {
        let sw = Stopwords::builtin();
        let phrases = noun_phrases("Albert Einstein developed the theory.", &sw);
        assert!(phrases.contains(&"albert einstein".to_string()));
    }

    #[test]
    fn test_content_word_runs() {
        let sw = Stopwords::builtin();
        let phrases = noun_phrases("The quick analysis produced results.", &sw);
        assert!(phrases.contains(&"quick analysis produced results".to_string()));
    }

    #[test]
    fn test_dedup_first_seen() {
        let sw = Stopwords::builtin();
        let phrases = noun_phrases("New York is big. New York is old.", &sw);
        let count = phrases.iter().filter(|p| p.as_str() == "new york").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_run_capped_at_max_words() {
        let sw = Stopwords::builtin();
        let extractor = NounPhraseExtractor {
            min_words: 2,
            max_words: 2,
        };
        let phrases = extractor.extract("fresh warm bread rolls", &sw);
        assert!(phrases.contains(&"fresh warm".to_string()));
    }

    #[test]
    fn test_no_phrases_in_stopword_text() {
        let sw = Stopwords::builtin();
        assert!(noun_phrases("the of and but", &sw).is_empty());
    }
}
