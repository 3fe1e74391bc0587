// Downloadable artifacts: plain-text reports and the batch-sentiment
// CSV, each with its fixed file name.
use std::fmt::Write as _;

use crate::error::{AnalysisError, Result};
use crate::nlp::merge::{BatchExtractionReport, ExtractionReport};
use crate::nlp::ner::CustomMatches;
use crate::nlp::qa::MultiAnswerReport;
use crate::nlp::relations::RelationshipReport;
use crate::nlp::sentiment::SentimentComparison;
use crate::nlp::summarization::{BulletSummary, KeywordSummary, SummaryResult};
use crate::session::SessionState;

pub const ENTITIES_FILE: &str = "extracted_entities.txt";
pub const BATCH_ENTITIES_FILE: &str = "batch_entity_results.txt";
pub const CUSTOM_ENTITIES_FILE: &str = "custom_entities.txt";
pub const RELATIONSHIPS_FILE: &str = "entity_relationships.txt";
pub const SUMMARY_FILE: &str = "summary.txt";
pub const BULLETS_FILE: &str = "bullet_points.txt";
pub const KEYWORDS_FILE: &str = "keywords_and_phrases.txt";
pub const QA_FILE: &str = "qa_results.txt";
pub const QA_SESSION_FILE: &str = "interactive_qa_session.txt";
pub const GENERATED_QUESTIONS_FILE: &str = "generated_questions.txt";
pub const SENTIMENT_CSV_FILE: &str = "sentiment_analysis_results.csv";

pub fn entity_report(report: &ExtractionReport) -> String {
    let mut out = String::from("Named Entity Recognition Results\n\n");
    for (category, entries) in report.entities.iter() {
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{category}:");
        for entity in entries {
            let _ = writeln!(
                out,
                "- {} (confidence: {:.0}%)",
                entity.text,
                entity.confidence * 100.0
            );
        }
        out.push('\n');
    }
    out
}

pub fn batch_entity_report(batch: &BatchExtractionReport) -> String {
    let mut out = String::from("Batch Entity Extraction Results\n\n");
    for item in &batch.results {
        let _ = writeln!(out, "=== Text {} ===", item.text_id);
        let _ = writeln!(out, "Preview: {}", item.preview);
        let _ = writeln!(out, "Total entities: {}\n", item.report.total_entities);
        for (category, entries) in item.report.entities.iter() {
            if entries.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{category}:");
            for entity in entries {
                let _ = writeln!(out, "- {}", entity.text);
            }
            out.push('\n');
        }
    }
    for failure in &batch.failures {
        let _ = writeln!(out, "=== Text {} FAILED: {} ===", failure.text_id, failure.error);
    }
    out
}

pub fn custom_entity_report(results: &[CustomMatches]) -> String {
    let mut out = String::from("Custom Pattern Extraction Results\n\n");
    for result in results {
        if result.matches.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}:", result.name);
        for text in &result.matches {
            let _ = writeln!(out, "- {text}");
        }
        out.push('\n');
    }
    out
}

pub fn relationship_report(
    entities: &ExtractionReport,
    relations: &RelationshipReport,
) -> String {
    let mut out = String::from("Entity Relationship Analysis\n\nEXTRACTED ENTITIES:\n");
    for (category, entries) in entities.entities.iter() {
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{category}:");
        for entity in entries {
            let _ = writeln!(out, "- {}", entity.text);
        }
    }

    out.push_str("\n\nIDENTIFIED RELATIONSHIPS:\n");
    for rel in &relations.relationships {
        let _ = writeln!(
            out,
            "- {} {} {} ({}-{})",
            rel.entity1,
            rel.kind.as_str(),
            rel.entity2,
            rel.pair.0,
            rel.pair.1
        );
    }
    out
}

pub fn summary_report(result: &SummaryResult) -> String {
    result.summary.clone()
}

pub fn bullet_report(result: &BulletSummary) -> String {
    result
        .points
        .iter()
        .map(|p| format!("• {p}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn keyword_report(result: &KeywordSummary) -> String {
    let mut out = String::from("Keywords:\n");
    for keyword in &result.keywords {
        let _ = writeln!(out, "- {keyword}");
    }
    out.push_str("\nKey Phrases:\n");
    for phrase in &result.key_phrases {
        let _ = writeln!(out, "- {phrase}");
    }
    out
}

pub fn qa_report(report: &MultiAnswerReport) -> String {
    let mut out = String::new();
    for item in &report.results {
        let _ = writeln!(out, "Q{}: {}", item.question_id, item.question);
        let _ = writeln!(out, "A{}: {}", item.question_id, item.answer);
        let _ = writeln!(out, "Confidence: {:.0}%\n", item.confidence * 100.0);
    }
    out
}

pub fn qa_session_report(session: &SessionState) -> String {
    let mut out = String::from("Interactive Q&A Session\n\n");
    for (i, exchange) in session.qa_history().iter().enumerate() {
        let _ = writeln!(out, "Q{}: {}", i + 1, exchange.question);
        let _ = writeln!(out, "A{}: {}", i + 1, exchange.answer);
        let _ = writeln!(out, "Confidence: {:.0}%\n", exchange.confidence * 100.0);
    }
    out
}

pub fn generated_questions_report(questions: &[String]) -> String {
    let mut out = String::from("Generated Questions:\n\n");
    for (i, q) in questions.iter().enumerate() {
        let _ = writeln!(out, "{}. {q}", i + 1);
    }
    out
}

/// CSV export for batch sentiment results.
pub fn sentiment_csv(comparisons: &[SentimentComparison]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "text_id",
            "preview",
            "sentiment",
            "polarity",
            "subjectivity",
            "confidence",
        ])
        .map_err(|e| AnalysisError::extraction(format!("csv write failed: {e}")))?;

    for item in comparisons {
        writer
            .write_record([
                item.text_id.to_string(),
                item.preview.clone(),
                item.sentiment.to_string(),
                format!("{:.4}", item.polarity),
                format!("{:.4}", item.subjectivity),
                format!("{:.4}", item.confidence),
            ])
            .map_err(|e| AnalysisError::extraction(format!("csv write failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::extraction(format!("csv write failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AnalysisError::extraction(format!("csv encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::merge::extract_entities;
    use crate::nlp::relations::relationships;
    use crate::nlp::sentiment::{compare_sentiments, SentimentLabel};
    use crate::nlp::summarization::bullet_point_summary;

    #[test]
    fn test_entity_report_lists_categories() {
        let report = extract_entities("Dr. Sarah Johnson works at Microsoft in New York.").unwrap();
        let text = entity_report(&report);
        assert!(text.starts_with("Named Entity Recognition Results"));
        assert!(text.contains("PERSON:"));
        assert!(text.contains("- Sarah Johnson (confidence: 80%)"));
    }

    #[test]
    fn test_relationship_report_triples() {
        let report = extract_entities("Dr. Sarah Johnson works at Microsoft in New York.").unwrap();
        let relations = relationships(&report.entities);
        let text = relationship_report(&report, &relations);
        assert!(text.contains("- Sarah Johnson associated_with Microsoft (PERSON-ORGANIZATION)"));
    }

    #[test]
    fn test_bullet_report_renders_glyphs() {
        let bullets = bullet_point_summary("One here. Two there. Three anywhere.", 5).unwrap();
        let text = bullet_report(&bullets);
        assert!(text.starts_with("• One here."));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_sentiment_csv_shape() {
        let report = compare_sentiments(&[
            "I love this wonderful product.".to_string(),
            "This is a terrible disaster.".to_string(),
        ]);
        let csv = sentiment_csv(&report.comparisons).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "text_id,preview,sentiment,polarity,subjectivity,confidence"
        );
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(report.comparisons[0].sentiment, SentimentLabel::Positive);
    }
}
