// Secondary entity chunker: proper-noun spans classified by
// structural signals. Lower fidelity than the pattern path on purpose;
// offsets are nominal and confidence is fixed at 0.7.
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::nlp::ner::{EntityCategory, EntityMatch, MatchSource, CHUNKER_CONFIDENCE};
use crate::nlp::normalize::sentences;

const PERSON_PREFIX: &[&str] = &["mr", "mrs", "ms", "dr", "prof"];

const ORG_SUFFIX: &[&str] = &[
    "inc",
    "corp",
    "llc",
    "ltd",
    "company",
    "corporation",
    "group",
    "institute",
    "university",
    "college",
];

// "at" and "to" precede organizations too often to be location signals.
const LOC_PREPOSITION: &[&str] = &["in", "from", "near"];

// Capitalized words that start sentences without being entities.
static SENTENCE_STARTERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "this", "that", "these", "those", "it", "he", "she", "we", "they",
        "i", "in", "on", "at", "to", "for", "from", "by", "with", "and", "but", "or", "so",
        "if", "because", "what", "where", "when", "who", "why", "how", "is", "are", "was",
        "were", "there", "here", "then", "now", "today", "yesterday", "tomorrow", "please",
        "every", "after", "before", "once", "eventually",
    ]
    .iter()
    .copied()
    .collect()
});

fn strip_punct(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_capitalized_word(token: &str) -> bool {
    let core = strip_punct(token);
    let mut chars = core.chars();
    match chars.next() {
        Some(first) => first.is_uppercase() && core.chars().skip(1).all(|c| c.is_alphabetic()),
        None => false,
    }
}

fn is_honorific(token: &str) -> bool {
    PERSON_PREFIX.contains(&strip_punct(token).to_lowercase().as_str())
}

fn classify(span: &[&str], preceding: Option<&str>) -> Option<EntityCategory> {
    let first = span.first()?;
    let last = span.last()?;

    if is_honorific(first) {
        return Some(EntityCategory::Person);
    }
    if ORG_SUFFIX.contains(&strip_punct(last).to_lowercase().as_str()) {
        return Some(EntityCategory::Organization);
    }
    if let Some(prev) = preceding {
        if LOC_PREPOSITION.contains(&strip_punct(prev).to_lowercase().as_str()) {
            return Some(EntityCategory::Location);
        }
    }
    if span.len() >= 2 {
        return Some(EntityCategory::Person);
    }
    None
}

/// Chunks the text into PERSON / ORGANIZATION / LOCATION spans.
///
/// Consecutive capitalized tokens form a span; the span text rejoins
/// its tokens with single spaces. Geo-political spans land in
/// LOCATION. Never fails; anything it cannot classify degrades to an
/// empty or partial result.
pub fn chunk(text: &str) -> HashMap<EntityCategory, Vec<EntityMatch>> {
    let mut out: HashMap<EntityCategory, Vec<EntityMatch>> = HashMap::new();

    for sentence in sentences(text) {
        let tokens: Vec<&str> = sentence.text.split_whitespace().collect();

        let mut i = 0;
        while i < tokens.len() {
            let starts_span = (is_capitalized_word(tokens[i]) || is_honorific(tokens[i]))
                && !(i == 0
                    && SENTENCE_STARTERS.contains(strip_punct(tokens[i]).to_lowercase().as_str()));
            if !starts_span {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < tokens.len() && is_capitalized_word(tokens[j]) {
                j += 1;
            }

            let span = &tokens[i..j];
            let preceding = if i > 0 { Some(tokens[i - 1]) } else { None };
            if let Some(category) = classify(span, preceding) {
                // The honorific is a classification signal, not part of
                // the name itself.
                let text = span
                    .iter()
                    .filter(|t| !is_honorific(t))
                    .map(|t| strip_punct(t).to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    out.entry(category).or_default().push(EntityMatch {
                        text,
                        category,
                        start: 0,
                        end: 0,
                        confidence: CHUNKER_CONFIDENCE,
                        source: MatchSource::Chunker,
                    });
                }
            }
            i = j;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_honorific_person() {
        let result = chunk("Dr. Sarah Johnson works at Microsoft in New York.");
        let persons = &result[&EntityCategory::Person];
        assert!(persons.iter().any(|e| e.text == "Sarah Johnson"));
        assert!(persons.iter().all(|e| e.confidence == CHUNKER_CONFIDENCE));
    }

    #[test]
    fn test_preposition_location() {
        let result = chunk("The team met in Boston last week.");
        let locations = &result[&EntityCategory::Location];
        assert!(locations.iter().any(|e| e.text == "Boston"));
    }

    #[test]
    fn test_org_suffix() {
        let result = chunk("She founded Acme Corp last year.");
        let orgs = &result[&EntityCategory::Organization];
        assert!(orgs.iter().any(|e| e.text == "Acme Corp"));
    }

    #[test]
    fn test_two_token_default_person() {
        let result = chunk("Albert Einstein was born in 1879.");
        let persons = &result[&EntityCategory::Person];
        assert!(persons.iter().any(|e| e.text == "Albert Einstein"));
    }

    #[test]
    fn test_offsets_are_nominal() {
        let result = chunk("Albert Einstein was here.");
        let person = &result[&EntityCategory::Person][0];
        assert_eq!((person.start, person.end), (0, 0));
    }

    #[test]
    fn test_sentence_starters_skipped() {
        let result = chunk("He developed the theory of relativity.");
        assert!(result.get(&EntityCategory::Person).is_none());
    }

    #[test]
    fn test_plain_text_degrades_to_empty() {
        let result = chunk("nothing capitalized happens here at all.");
        assert!(result.is_empty());
    }
}
