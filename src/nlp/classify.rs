// Keyword-category text classification with a sentiment fallback.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{require_min_chars, Result};
use crate::nlp::sentiment;

static CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "technology",
        &["computer", "software", "tech", "programming", "code", "app", "digital", "internet", "ai", "machine learning"],
    ),
    (
        "business",
        &["company", "market", "finance", "money", "profit", "sales", "business", "corporate", "investment"],
    ),
    (
        "sports",
        &["game", "player", "team", "score", "match", "sport", "football", "basketball", "soccer", "tennis"],
    ),
    (
        "health",
        &["doctor", "medicine", "hospital", "health", "disease", "treatment", "medical", "patient", "therapy"],
    ),
    (
        "education",
        &["school", "student", "teacher", "learn", "education", "university", "study", "class", "academic"],
    ),
    (
        "entertainment",
        &["movie", "music", "show", "actor", "celebrity", "film", "concert", "entertainment", "tv"],
    ),
    (
        "news",
        &["breaking", "report", "news", "journalist", "headline", "story", "media", "press"],
    ),
    (
        "personal",
        &["i", "me", "my", "myself", "personal", "life", "family", "friend", "relationship"],
    ),
];

static CATEGORY_PATTERNS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let patterns = keywords
                .iter()
                .map(|kw| Regex::new(&format!(r"\b{}\b", regex::escape(kw))).unwrap())
                .collect();
            (*category, patterns)
        })
        .collect()
});

#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
    pub all_scores: Vec<(String, f64)>,
    pub text_length: usize,
    pub word_count: usize,
}

/// Classifies text by word-boundary keyword counts normalized by the
/// word count; zero everywhere falls back to sentiment strength.
pub fn classify_text(text: &str) -> Result<Classification> {
    require_min_chars(text, 1)?;

    let lower = text.to_lowercase();
    let word_count = text.split_whitespace().count();

    let all_scores: Vec<(String, f64)> = CATEGORY_PATTERNS
        .iter()
        .map(|(category, patterns)| {
            let hits: usize = patterns.iter().map(|p| p.find_iter(&lower).count()).sum();
            let score = if word_count > 0 {
                hits as f64 / word_count as f64
            } else {
                0.0
            };
            (category.to_string(), score)
        })
        .collect();

    let best = all_scores
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let (category, confidence) = match best {
        Some((cat, score)) if *score > 0.0 => (cat.clone(), (score * 2.0).min(1.0)),
        _ => {
            // No keyword signal; strong sentiment suggests personal
            // content, otherwise it stays general.
            let polarity = sentiment::analyze_sentiment(text)
                .map(|r| r.polarity)
                .unwrap_or(0.0);
            if polarity.abs() > 0.3 {
                ("personal".to_string(), polarity.abs() * 0.7)
            } else {
                ("general".to_string(), 0.3)
            }
        }
    };

    Ok(Classification {
        category,
        confidence,
        all_scores,
        text_length: text.len(),
        word_count,
    })
}

/// Human-readable description for a category label.
pub fn category_description(category: &str) -> &'static str {
    match category {
        "technology" => "Technology-related content including computers, software, and digital topics",
        "business" => "Business and finance-related content",
        "sports" => "Sports and athletics-related content",
        "health" => "Health and medical-related content",
        "education" => "Educational and academic content",
        "entertainment" => "Entertainment industry and media content",
        "news" => "News and journalism content",
        "personal" => "Personal experiences and opinions",
        "general" => "General content that doesn't fit specific categories",
        _ => "No description available",
    }
}
