// Merging pattern and chunker results into one deduplicated
// collection, plus the aggregate statistics reported with it.
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{require_min_chars, Result};
use crate::nlp::chunker;
use crate::nlp::ner::{self, EntityCategory, EntityMatch, ALL_CATEGORIES};

/// Minimum input length for entity extraction, in characters.
pub const MIN_NER_CHARS: usize = 10;

/// Entities per category, insertion order = discovery order.
///
/// Invariant: within one category no two entries have case-insensitively
/// equal text; the first occurrence wins, pattern sources before
/// chunker sources.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityCollection {
    entities: HashMap<EntityCategory, Vec<EntityMatch>>,
}

impl EntityCollection {
    pub fn get(&self, category: EntityCategory) -> &[EntityMatch] {
        self.entities.get(&category).map_or(&[], |v| v.as_slice())
    }

    /// Categories in reporting order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, &[EntityMatch])> {
        ALL_CATEGORIES.iter().map(move |&c| (c, self.get(c)))
    }

    pub fn total(&self) -> usize {
        ALL_CATEGORIES.iter().map(|&c| self.get(c).len()).sum()
    }

    /// Drops every category not in `selected`.
    pub fn retain_categories(&mut self, selected: &[EntityCategory]) {
        self.entities.retain(|c, _| selected.contains(c));
    }
}

/// Unions two extraction results per category.
///
/// Pattern entries come first (already internally deduplicated), then
/// chunker entries whose text does not already appear case-insensitively.
pub fn merge(
    rule_based: HashMap<EntityCategory, Vec<EntityMatch>>,
    secondary: HashMap<EntityCategory, Vec<EntityMatch>>,
) -> EntityCollection {
    let mut entities: HashMap<EntityCategory, Vec<EntityMatch>> = HashMap::new();

    for &category in &ALL_CATEGORIES {
        let mut entries: Vec<EntityMatch> = rule_based.get(&category).cloned().unwrap_or_default();

        if let Some(extra) = secondary.get(&category) {
            for candidate in extra {
                let lower = candidate.text.to_lowercase();
                if !entries.iter().any(|e| e.text.to_lowercase() == lower) {
                    entries.push(candidate.clone());
                }
            }
        }

        entities.insert(category, entries);
    }

    EntityCollection { entities }
}

/// Comprehensive extraction result with aggregate statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub entities: EntityCollection,
    pub total_entities: usize,
    pub entity_counts: Vec<(EntityCategory, usize)>,
    pub most_common: Vec<(String, usize)>,
    pub text_length: usize,
}

fn build_report(entities: EntityCollection, text_length: usize) -> ExtractionReport {
    let entity_counts: Vec<(EntityCategory, usize)> = ALL_CATEGORIES
        .iter()
        .map(|&c| (c, entities.get(c).len()))
        .collect();

    // Raw occurrence counts across all categories combined; ties keep
    // first-seen order.
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for (_, entries) in entities.iter() {
        for e in entries {
            let entry = counts.entry(e.text.clone()).or_insert(0);
            if *entry == 0 {
                order.push(e.text.clone());
            }
            *entry += 1;
        }
    }
    let mut most_common: Vec<(String, usize)> =
        order.into_iter().map(|t| (t.clone(), counts[&t])).collect();
    most_common.sort_by(|a, b| b.1.cmp(&a.1));
    most_common.truncate(10);

    ExtractionReport {
        total_entities: entities.total(),
        entity_counts,
        most_common,
        entities,
        text_length,
    }
}

/// Runs both extraction sources over the text and merges them.
pub fn extract_entities(text: &str) -> Result<ExtractionReport> {
    require_min_chars(text, MIN_NER_CHARS)?;

    let rule_based = ner::extract_patterns(text);
    let secondary = chunker::chunk(text);
    let merged = merge(rule_based, secondary);

    Ok(build_report(merged, text.len()))
}

/// Like [`extract_entities`] but reports only the selected categories.
pub fn extract_selected(text: &str, selected: &[EntityCategory]) -> Result<ExtractionReport> {
    require_min_chars(text, MIN_NER_CHARS)?;

    let rule_based = ner::extract_patterns(text);
    let secondary = chunker::chunk(text);
    let mut merged = merge(rule_based, secondary);
    merged.retain_categories(selected);

    Ok(build_report(merged, text.len()))
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub text_id: usize,
    pub preview: String,
    pub report: ExtractionReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub text_id: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchExtractionReport {
    pub results: Vec<BatchItem>,
    pub failures: Vec<BatchFailure>,
    pub total_texts: usize,
    pub total_entities: usize,
    pub average_entities_per_text: f64,
    pub combined_counts: Vec<(EntityCategory, usize)>,
}

fn preview_of(text: &str) -> String {
    if text.chars().count() > 100 {
        let cut: String = text.chars().take(100).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Extracts entities from several texts independently.
///
/// Items keep their 1-based input index. A failing item lands in the
/// failure list and never aborts the rest of the batch.
pub fn extract_batch(texts: &[String]) -> BatchExtractionReport {
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for (i, text) in texts.iter().enumerate() {
        match extract_entities(text) {
            Ok(report) => results.push(BatchItem {
                text_id: i + 1,
                preview: preview_of(text),
                report,
            }),
            Err(e) => failures.push(BatchFailure {
                text_id: i + 1,
                error: e.to_string(),
            }),
        }
    }

    let total_entities: usize = results.iter().map(|r| r.report.total_entities).sum();
    let average = if results.is_empty() {
        0.0
    } else {
        total_entities as f64 / results.len() as f64
    };

    let combined_counts: Vec<(EntityCategory, usize)> = ALL_CATEGORIES
        .iter()
        .map(|&c| {
            let count = results
                .iter()
                .map(|r| r.report.entities.get(c).len())
                .sum();
            (c, count)
        })
        .collect();

    BatchExtractionReport {
        total_texts: texts.len(),
        total_entities,
        average_entities_per_text: average,
        combined_counts,
        results,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::nlp::ner::MatchSource;

    #[test]
    fn test_round_trip_extraction() {
        let report =
            extract_entities("Dr. Sarah Johnson works at Microsoft in New York.").unwrap();
        let persons = report.entities.get(EntityCategory::Person);
        let orgs = report.entities.get(EntityCategory::Organization);
        let locations = report.entities.get(EntityCategory::Location);

        assert!(persons.iter().any(|e| e.text == "Sarah Johnson"));
        assert!(orgs.iter().any(|e| e.text == "Microsoft"));
        assert!(locations.iter().any(|e| e.text == "New York"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let text = "Dr. Sarah Johnson works at Microsoft in New York.";
        let a = extract_entities(text).unwrap();
        let b = extract_entities(text).unwrap();
        for (cat, entries) in a.entities.iter() {
            assert_eq!(entries, b.entities.get(cat));
        }
    }

    #[test]
    fn test_no_case_insensitive_duplicates_per_category() {
        let report =
            extract_entities("Albert Einstein met ALBERT EINSTEIN near Berlin in Germany.")
                .unwrap();
        for (_, entries) in report.entities.iter() {
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    assert_ne!(a.text.to_lowercase(), b.text.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn test_pattern_entries_win_over_chunker() {
        let report = extract_entities("Maria Garcia lives in Chicago with Maria Garcia.").unwrap();
        let persons = report.entities.get(EntityCategory::Person);
        let maria: Vec<_> = persons
            .iter()
            .filter(|e| e.text.to_lowercase() == "maria garcia")
            .collect();
        assert_eq!(maria.len(), 1);
        assert_eq!(maria[0].source, MatchSource::Pattern);
    }

    #[test]
    fn test_too_short_input() {
        let err = extract_entities("tiny").unwrap_err();
        assert!(matches!(err, AnalysisError::InputTooShort { required: 10, .. }));
    }

    #[test]
    fn test_entity_counts_sum_to_total() {
        let report =
            extract_entities("Visit www.example.com or call 555-123-4567 on 2024-01-15.").unwrap();
        let sum: usize = report.entity_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(sum, report.total_entities);
        assert!(report.total_entities > 0);
    }

    #[test]
    fn test_most_common_ranks_by_raw_count() {
        // "New York" appears in LOCATION; a text mentioned in two
        // categories counts once per category entry.
        let report = extract_entities(
            "Alice Smith visited New York. Bob Jones stayed in Chicago near Chicago River.",
        )
        .unwrap();
        assert!(report.most_common.len() <= 10);
        for window in report.most_common.windows(2) {
            assert!(window[0].1 >= window[1].1);
        }
    }

    #[test]
    fn test_batch_isolates_empty_item() {
        let texts = vec![
            "Dr. Sarah Johnson works at Microsoft in New York.".to_string(),
            "".to_string(),
            "Albert Einstein was born in Germany.".to_string(),
        ];
        let batch = extract_batch(&texts);
        assert_eq!(batch.total_texts, 3);
        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[0].text_id, 1);
        assert_eq!(batch.results[1].text_id, 3);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].text_id, 2);
    }

    #[test]
    fn test_batch_combined_counts() {
        let texts = vec![
            "Alice Smith lives in Chicago.".to_string(),
            "Bob Jones lives in Dallas.".to_string(),
        ];
        let batch = extract_batch(&texts);
        let persons = batch
            .combined_counts
            .iter()
            .find(|(c, _)| *c == EntityCategory::Person)
            .unwrap()
            .1;
        assert_eq!(persons, 2);
        assert_eq!(batch.average_entities_per_text * 2.0, batch.total_entities as f64);
    }

    #[test]
    fn test_selected_categories_filter() {
        let report = extract_selected(
            "Dr. Sarah Johnson works at Microsoft in New York on 2024-01-15.",
            &[EntityCategory::Person, EntityCategory::Organization],
        )
        .unwrap();
        assert!(report.entities.get(EntityCategory::Date).is_empty());
        assert!(!report.entities.get(EntityCategory::Person).is_empty());
        let sum: usize = report.entity_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(sum, report.total_entities);
    }
}
