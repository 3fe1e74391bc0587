// Text normalization: sentence splitting, word tokenization, stop-word filtering.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

// Fallback stop words, used when the richer list is unavailable.
static BUILTIN_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
    "what", "which", "who", "whom", "this", "that", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do", "does",
    "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "through", "during", "before", "after",
    "above", "below", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once",
];

/// A single sentence with its position in the document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

/// A normalized word token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub alphabetic: bool,
    pub stopword: bool,
}

/// Stop-word set fixed at construction time.
///
/// Either the rich list from the `stop-words` corpus or the built-in
/// fallback is chosen once; a single instance is used for a whole
/// document run so the two lists are never mixed mid-document.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwords {
    /// Prefer the rich English list, falling back to the built-in set.
    pub fn new() -> Self {
        let rich = stop_words::get(stop_words::LANGUAGE::English);
        if rich.is_empty() {
            Self::builtin()
        } else {
            Self {
                words: rich.into_iter().map(|w| w.to_lowercase()).collect(),
            }
        }
    }

    /// The fixed built-in English list.
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Splits text into sentences.
///
/// Whitespace runs are collapsed first. A sentence is a maximal span
/// ending in a run of `.`, `!` or `?`; a trailing fragment without
/// terminal punctuation still counts as a sentence.
pub fn sentences(text: &str) -> Vec<Sentence> {
    let cleaned = WHITESPACE_RUN.replace_all(text, " ");
    let cleaned = cleaned.trim();

    let mut out = Vec::new();
    let mut consumed = 0;
    for m in SENTENCE_PATTERN.find_iter(cleaned) {
        let s = m.as_str().trim();
        if !s.is_empty() {
            out.push(Sentence {
                index: out.len(),
                text: s.to_string(),
            });
        }
        consumed = m.end();
    }
    let rest = cleaned[consumed..].trim();
    if !rest.is_empty() {
        out.push(Sentence {
            index: out.len(),
            text: rest.to_string(),
        });
    }
    out
}

/// Lower-cased `\b\w+\b` word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Tokens annotated with the flags the scoring stages care about.
pub fn annotated_tokens(text: &str, stopwords: &Stopwords) -> Vec<Token> {
    tokenize(text)
        .into_iter()
        .map(|w| {
            let alphabetic = w.chars().all(|c| c.is_alphabetic());
            let stopword = stopwords.contains(&w);
            Token {
                text: w,
                alphabetic,
                stopword,
            }
        })
        .collect()
}

/// Lower-cased alphabetic non-stop-word tokens; the only tokens that
/// ever contribute to frequency scores.
pub fn qualifying_tokens(text: &str, stopwords: &Stopwords) -> Vec<String> {
    annotated_tokens(text, stopwords)
        .into_iter()
        .filter(|t| t.alphabetic && !t.stopword)
        .map(|t| t.text)
        .collect()
}
