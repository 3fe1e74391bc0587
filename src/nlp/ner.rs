// Pattern-based entity extraction: ordered regex sets per category,
// run over the whole document rather than per sentence.
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{AnalysisError, Result};

/// Confidence assigned to every pattern-sourced match.
pub const PATTERN_CONFIDENCE: f64 = 0.8;
/// Confidence assigned to every chunker-sourced match.
pub const CHUNKER_CONFIDENCE: f64 = 0.7;

/// Fixed entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityCategory {
    Person,
    Organization,
    Location,
    Date,
    Time,
    Money,
    Email,
    Phone,
    Url,
}

/// The merge order over categories; also the reporting order.
pub const ALL_CATEGORIES: [EntityCategory; 9] = [
    EntityCategory::Person,
    EntityCategory::Organization,
    EntityCategory::Location,
    EntityCategory::Date,
    EntityCategory::Time,
    EntityCategory::Money,
    EntityCategory::Email,
    EntityCategory::Phone,
    EntityCategory::Url,
];

impl EntityCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Person => "PERSON",
            EntityCategory::Organization => "ORGANIZATION",
            EntityCategory::Location => "LOCATION",
            EntityCategory::Date => "DATE",
            EntityCategory::Time => "TIME",
            EntityCategory::Money => "MONEY",
            EntityCategory::Email => "EMAIL",
            EntityCategory::Phone => "PHONE",
            EntityCategory::Url => "URL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PERSON" => Some(EntityCategory::Person),
            "ORGANIZATION" | "ORG" => Some(EntityCategory::Organization),
            "LOCATION" | "LOC" => Some(EntityCategory::Location),
            "DATE" => Some(EntityCategory::Date),
            "TIME" => Some(EntityCategory::Time),
            "MONEY" => Some(EntityCategory::Money),
            "EMAIL" => Some(EntityCategory::Email),
            "PHONE" => Some(EntityCategory::Phone),
            "URL" => Some(EntityCategory::Url),
            _ => None,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a match came from. Pattern sources are processed before
/// chunker sources, and pattern offsets are the authoritative ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Pattern,
    Chunker,
}

/// A single extracted entity occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub text: String,
    pub category: EntityCategory,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    pub source: MatchSource,
}

struct CategoryPatterns {
    category: EntityCategory,
    patterns: Vec<Regex>,
}

// Lexical alternations match case-insensitively; shape patterns that
// encode capitalization compile as written, otherwise they degenerate
// into matching any pair of words.
fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

fn shape(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

// Ordered pattern sets per category. Earlier patterns win dedup within
// a category; PERSON is processed last so its shape patterns can be
// screened against accepted organizations and locations.
static PATTERN_SETS: Lazy<Vec<CategoryPatterns>> = Lazy::new(|| {
    vec![
        CategoryPatterns {
            category: EntityCategory::Organization,
            patterns: vec![
                shape(r"\b[A-Z][a-z]+ (?:Inc|Corp|LLC|Ltd|Company|Corporation|Group|Institute|University)\b"),
                ci(r"\b(?:Microsoft|Google|Apple|Amazon|Facebook|Tesla|IBM|Intel|Oracle)\b"),
                shape(r"\b[A-Z][A-Z]+ [A-Z][a-z]+\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Location,
            patterns: vec![
                shape(r"\b[A-Z][a-z]+ (?:City|State|Country|Street|Avenue|Road|Boulevard|Drive|Lane)\b"),
                ci(r"\b(?:New York|Los Angeles|Chicago|Houston|Phoenix|Philadelphia|San Antonio|San Diego|Dallas|San Jose)\b"),
                ci(r"\b(?:California|Texas|Florida|New York|Pennsylvania|Illinois|Ohio|Georgia|North Carolina|Michigan)\b"),
                ci(r"\b(?:USA|United States|UK|United Kingdom|Canada|Australia|Germany|France|Japan|China)\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Date,
            patterns: vec![
                ci(r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b"),
                shape(r"\b\d{1,2}/\d{1,2}/\d{4}\b"),
                shape(r"\b\d{4}-\d{2}-\d{2}\b"),
                shape(r"\b(?:19|20)\d{2}\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Time,
            patterns: vec![
                shape(r"\b\d{1,2}:\d{2}(?:\s*(?:AM|PM|am|pm))?\b"),
                ci(r"\b(?:morning|afternoon|evening|night|noon|midnight)\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Money,
            patterns: vec![
                shape(r"\$\d+(?:,\d{3})*(?:\.\d{2})?\b"),
                ci(r"\b\d+(?:,\d{3})*\s*(?:dollars?|USD|cents?)\b"),
                shape(r"(?:€|£|¥)\d+(?:,\d{3})*(?:\.\d{2})?\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Email,
            patterns: vec![shape(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")],
        },
        CategoryPatterns {
            category: EntityCategory::Phone,
            patterns: vec![
                shape(r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b"),
                shape(r"\b\d{3}-\d{3}-\d{4}\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Url,
            patterns: vec![
                ci(r#"https?://[^\s<>"]+|www\.[^\s<>"]+\.[^\s<>"]+"#),
                shape(r"\b[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?:/[^\s]*)?\b"),
            ],
        },
        CategoryPatterns {
            category: EntityCategory::Person,
            patterns: vec![
                shape(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b"),
                shape(r"\b(?:Mr|Mrs|Ms|Dr|Prof)\. [A-Z][a-z]+\b"),
                shape(r"\b[A-Z][a-z]+ [A-Z]\. [A-Z][a-z]+\b"),
            ],
        },
    ]
});

/// Runs every category's pattern list over the whole document.
///
/// Matches record exact offsets and the fixed pattern confidence.
/// Within a category a candidate is discarded when its text already
/// equals an accepted match's text case-insensitively. PERSON
/// candidates already accepted as an organization or location are
/// dropped as capitalization false positives.
pub fn extract_patterns(text: &str) -> HashMap<EntityCategory, Vec<EntityMatch>> {
    let mut out: HashMap<EntityCategory, Vec<EntityMatch>> = HashMap::new();

    for set in PATTERN_SETS.iter() {
        let mut entries: Vec<EntityMatch> = Vec::new();
        for pattern in &set.patterns {
            for m in pattern.find_iter(text) {
                let matched = m.as_str();
                let lower = matched.to_lowercase();
                if entries.iter().any(|e| e.text.to_lowercase() == lower) {
                    continue;
                }
                if overlaps(&entries, m.start(), m.end()) {
                    continue;
                }
                if set.category == EntityCategory::Person && known_non_person(&out, &lower) {
                    continue;
                }
                entries.push(EntityMatch {
                    text: matched.to_string(),
                    category: set.category,
                    start: m.start(),
                    end: m.end(),
                    confidence: PATTERN_CONFIDENCE,
                    source: MatchSource::Pattern,
                });
            }
        }
        out.insert(set.category, entries);
    }

    out
}

/// A span overlapping an accepted match in the same category is a
/// fragment of it, not a new entity.
fn overlaps(entries: &[EntityMatch], start: usize, end: usize) -> bool {
    entries.iter().any(|e| !(end <= e.start || start >= e.end))
}

fn known_non_person(accepted: &HashMap<EntityCategory, Vec<EntityMatch>>, lower: &str) -> bool {
    [EntityCategory::Organization, EntityCategory::Location]
        .iter()
        .filter_map(|c| accepted.get(c))
        .flatten()
        .any(|e| e.text.to_lowercase() == lower)
}

/// Result of one custom pattern: the distinct strings it matched.
///
/// Deliberately coarser than the standard extraction; no offsets and
/// no confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMatches {
    pub name: String,
    pub matches: Vec<String>,
}

/// Applies user-supplied name/regex pairs, case-insensitively.
///
/// Matched strings are de-duplicated per pattern, first seen first.
pub fn extract_custom(text: &str, patterns: &[(String, String)]) -> Result<Vec<CustomMatches>> {
    if patterns.is_empty() {
        return Err(AnalysisError::config("no custom patterns supplied"));
    }

    let mut out = Vec::with_capacity(patterns.len());
    for (name, raw) in patterns {
        let regex = RegexBuilder::new(raw)
            .case_insensitive(true)
            .build()
            .map_err(|e| AnalysisError::config(format!("invalid pattern '{name}': {e}")))?;

        let mut matches: Vec<String> = Vec::new();
        for m in regex.find_iter(text) {
            let s = m.as_str().to_string();
            if !matches.contains(&s) {
                matches.push(s);
            }
        }
        out.push(CustomMatches {
            name: name.clone(),
            matches,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_extraction() {
        let entities = extract_patterns("Dr. Sarah Johnson met John Smith yesterday.");
        let persons = &entities[&EntityCategory::Person];
        assert!(persons.iter().any(|e| e.text == "Sarah Johnson"));
        assert!(persons.iter().any(|e| e.text == "John Smith"));
        assert!(persons.iter().all(|e| e.confidence == PATTERN_CONFIDENCE));
    }

    #[test]
    fn test_offsets_are_exact() {
        let text = "Email support@example.com today.";
        let entities = extract_patterns(text);
        let email = &entities[&EntityCategory::Email][0];
        assert_eq!(&text[email.start..email.end], "support@example.com");
    }

    #[test]
    fn test_case_insensitive_dedup_first_wins() {
        let entities = extract_patterns("Flights to Chicago, CHICAGO, and chicago.");
        let locations = &entities[&EntityCategory::Location];
        let hits: Vec<_> = locations
            .iter()
            .filter(|e| e.text.to_lowercase() == "chicago")
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "Chicago");
    }

    #[test]
    fn test_person_screened_against_locations() {
        let entities = extract_patterns("They flew to New York yesterday.");
        assert!(entities[&EntityCategory::Location]
            .iter()
            .any(|e| e.text == "New York"));
        assert!(entities[&EntityCategory::Person]
            .iter()
            .all(|e| e.text.to_lowercase() != "new york"));
    }

    #[test]
    fn test_known_organizations() {
        let entities = extract_patterns("Microsoft and Acme Corp shipped a product.");
        let orgs = &entities[&EntityCategory::Organization];
        assert!(orgs.iter().any(|e| e.text == "Microsoft"));
        assert!(orgs.iter().any(|e| e.text == "Acme Corp"));
    }

    #[test]
    fn test_date_and_money() {
        let entities = extract_patterns("Paid $1,250.00 on January 15, 2024.");
        assert!(entities[&EntityCategory::Date]
            .iter()
            .any(|e| e.text == "January 15, 2024"));
        assert!(entities[&EntityCategory::Money]
            .iter()
            .any(|e| e.text == "$1,250.00"));
    }

    #[test]
    fn test_custom_patterns_return_distinct_strings() {
        let patterns = vec![("Product Codes".to_string(), r"\b[A-Z]{2}-\d{4}\b".to_string())];
        let result = extract_custom("Codes AB-1234, CD-5678, AB-1234.", &patterns).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Product Codes");
        assert_eq!(result[0].matches, vec!["AB-1234", "CD-5678"]);
    }

    #[test]
    fn test_custom_patterns_require_at_least_one() {
        let err = extract_custom("text", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigurationError(_)));
    }

    #[test]
    fn test_custom_pattern_invalid_regex() {
        let patterns = vec![("Broken".to_string(), r"[unclosed".to_string())];
        let err = extract_custom("text", &patterns).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigurationError(_)));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(EntityCategory::parse("person"), Some(EntityCategory::Person));
        assert_eq!(EntityCategory::parse("ORG"), Some(EntityCategory::Organization));
        assert_eq!(EntityCategory::parse("bogus"), None);
    }
}
