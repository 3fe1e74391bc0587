// Lexicon-based sentiment: polarity from word lists with negation and
// intensity handling, plus emotion and subjectivity signals.
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::{require_min_chars, Result};
use crate::nlp::normalize::sentences;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "wonderful", "fantastic", "amazing", "awesome",
        "love", "happy", "joy", "pleased", "delighted", "satisfied", "perfect",
        "beautiful", "brilliant", "outstanding", "superb", "magnificent", "marvelous",
        "terrific", "fabulous", "exceptional", "impressive", "remarkable", "best",
        "better", "positive", "advantage", "benefit", "success", "successful",
        "win", "winner", "winning", "accomplished", "achievement", "triumph",
        "enjoy", "pleasant", "comfortable", "excited", "exciting", "thrilled",
        "approve", "approved", "approval", "like", "liked", "favorite", "prefer",
    ]
    .iter()
    .copied()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse",
        "hate", "angry", "sad", "upset", "disappointed", "dissatisfied", "unhappy",
        "fail", "failure", "failed", "problem", "issue", "wrong", "error",
        "difficult", "hard", "tough", "struggle", "struggling", "broken",
        "pain", "painful", "hurt", "hurting", "damage", "damaged", "disaster",
        "negative", "loss", "lose", "losing", "lost", "defeat", "defeated",
        "reject", "rejected", "rejection", "dislike", "disliked", "unpleasant",
        "uncomfortable", "disappointing", "frustrate", "frustrated", "frustrating",
    ]
    .iter()
    .copied()
    .collect()
});

static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "very", "extremely", "absolutely", "really", "incredibly", "highly", "totally",
        "quite", "so", "too",
    ]
    .iter()
    .copied()
    .collect()
});

static DIMINISHERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["slightly", "somewhat", "rather", "fairly", "pretty"]
        .iter()
        .copied()
        .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["not", "no", "never", "nothing", "nobody", "nowhere", "neither", "nor", "none"]
        .iter()
        .copied()
        .collect()
});

static EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "joy",
        &["happy", "joy", "excited", "wonderful", "amazing", "fantastic", "great", "excellent", "love", "perfect"],
    ),
    (
        "sadness",
        &["sad", "depressed", "unhappy", "disappointed", "terrible", "awful", "horrible", "hate", "worst", "miserable"],
    ),
    (
        "anger",
        &["angry", "furious", "annoyed", "irritated", "mad", "frustrated", "outraged", "livid", "rage", "disgusted"],
    ),
    (
        "fear",
        &["afraid", "scared", "worried", "anxious", "nervous", "terrified", "frightened", "panic", "concern", "stress"],
    ),
    (
        "surprise",
        &["surprised", "shocked", "amazed", "astonished", "unexpected", "sudden", "wow", "incredible", "unbelievable"],
    ),
    (
        "disgust",
        &["disgusting", "revolting", "sick", "gross", "awful", "repulsive", "horrible", "nasty", "terrible"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntensityAnalysis {
    pub level: String,
    pub intensifiers: usize,
    pub diminishers: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentenceSentiment {
    pub text: String,
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment: SentimentLabel,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: f64,
    pub emotion_scores: Vec<(String, f64)>,
    pub intensity: IntensityAnalysis,
    pub sentence_analysis: Vec<SentenceSentiment>,
    pub text_length: usize,
    pub word_count: usize,
    pub sentence_count: usize,
}

fn words_of(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Polarity in [-1, 1] and subjectivity in [0, 1] for one span of text.
fn score_span(words: &[String]) -> (f64, f64) {
    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut bearing = 0usize;

    for (i, word) in words.iter().enumerate() {
        let mut multiplier = 1.0;
        if i > 0 && INTENSIFIERS.contains(words[i - 1].as_str()) {
            multiplier = 1.5;
        }
        let negated = (i > 0 && NEGATIONS.contains(words[i - 1].as_str()))
            || (i > 1 && NEGATIONS.contains(words[i - 2].as_str()));

        if POSITIVE_WORDS.contains(word.as_str()) {
            bearing += 1;
            if negated {
                negative += multiplier;
            } else {
                positive += multiplier;
            }
        } else if NEGATIVE_WORDS.contains(word.as_str()) {
            bearing += 1;
            if negated {
                positive += multiplier;
            } else {
                negative += multiplier;
            }
        } else if INTENSIFIERS.contains(word.as_str()) || DIMINISHERS.contains(word.as_str()) {
            bearing += 1;
        }
    }

    let total = positive + negative;
    let polarity = if total == 0.0 {
        0.0
    } else {
        (positive - negative) / total
    };
    let subjectivity = if words.is_empty() {
        0.0
    } else {
        (bearing as f64 / words.len() as f64).min(1.0)
    };

    (polarity, subjectivity)
}

fn label_for(polarity: f64) -> SentimentLabel {
    if polarity > 0.1 {
        SentimentLabel::Positive
    } else if polarity < -0.1 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn emotion_scores(words: &[String]) -> Vec<(String, f64)> {
    let count = words.len().max(1) as f64;
    EMOTION_KEYWORDS
        .iter()
        .map(|(emotion, keywords)| {
            let hits = words
                .iter()
                .filter(|w| keywords.contains(&w.as_str()))
                .count();
            (emotion.to_string(), hits as f64 / count)
        })
        .collect()
}

fn intensity(words: &[String]) -> IntensityAnalysis {
    let intensifiers = words
        .iter()
        .filter(|w| INTENSIFIERS.contains(w.as_str()))
        .count();
    let diminishers = words
        .iter()
        .filter(|w| DIMINISHERS.contains(w.as_str()))
        .count();

    let total = intensifiers + diminishers;
    let ratio = if total > 0 {
        intensifiers as f64 / total as f64
    } else {
        0.5
    };
    let level = if ratio > 0.7 {
        "High"
    } else if ratio > 0.4 {
        "Medium"
    } else {
        "Low"
    };

    IntensityAnalysis {
        level: level.to_string(),
        intensifiers,
        diminishers,
        ratio,
    }
}

/// Full sentiment analysis of one text.
pub fn analyze_sentiment(text: &str) -> Result<SentimentReport> {
    require_min_chars(text, 1)?;

    let words = words_of(text);
    let (polarity, subjectivity) = score_span(&words);

    let sentence_analysis: Vec<SentenceSentiment> = sentences(text)
        .into_iter()
        .map(|s| {
            let sw = words_of(&s.text);
            let (p, subj) = score_span(&sw);
            SentenceSentiment {
                text: s.text,
                polarity: p,
                subjectivity: subj,
                sentiment: label_for(p),
            }
        })
        .collect();

    Ok(SentimentReport {
        sentiment: label_for(polarity),
        polarity,
        subjectivity,
        confidence: polarity.abs(),
        emotion_scores: emotion_scores(&words),
        intensity: intensity(&words),
        sentence_count: sentence_analysis.len(),
        sentence_analysis,
        text_length: text.len(),
        word_count: text.split_whitespace().count(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentComparison {
    pub text_id: usize,
    pub preview: String,
    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub comparisons: Vec<SentimentComparison>,
    pub average_polarity: f64,
    pub most_positive: Option<SentimentComparison>,
    pub most_negative: Option<SentimentComparison>,
    pub total_texts: usize,
}

fn preview_of(text: &str) -> String {
    if text.chars().count() > 50 {
        let cut: String = text.chars().take(50).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Compares sentiment across several texts; empty ones are skipped.
pub fn compare_sentiments(texts: &[String]) -> ComparisonReport {
    let mut comparisons = Vec::new();

    for (i, text) in texts.iter().enumerate() {
        let Ok(report) = analyze_sentiment(text) else {
            continue;
        };
        comparisons.push(SentimentComparison {
            text_id: i + 1,
            preview: preview_of(text),
            sentiment: report.sentiment,
            polarity: report.polarity,
            subjectivity: report.subjectivity,
            confidence: report.confidence,
        });
    }

    let average_polarity = if comparisons.is_empty() {
        0.0
    } else {
        comparisons.iter().map(|c| c.polarity).sum::<f64>() / comparisons.len() as f64
    };

    let most_positive = comparisons
        .iter()
        .max_by(|a, b| a.polarity.partial_cmp(&b.polarity).unwrap_or(std::cmp::Ordering::Equal))
        .cloned();
    let most_negative = comparisons
        .iter()
        .min_by(|a, b| a.polarity.partial_cmp(&b.polarity).unwrap_or(std::cmp::Ordering::Equal))
        .cloned();

    ComparisonReport {
        total_texts: comparisons.len(),
        average_polarity,
        most_positive,
        most_negative,
        comparisons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let report = analyze_sentiment("This is a wonderful day! I'm feeling great and happy!").unwrap();
        assert_eq!(report.sentiment, SentimentLabel::Positive);
        assert!(report.polarity > 0.1);
        assert_eq!(report.confidence, report.polarity.abs());
    }

    #[test]
    fn test_negative_text() {
        let report = analyze_sentiment("This is terrible and awful. I hate it!").unwrap();
        assert_eq!(report.sentiment, SentimentLabel::Negative);
        assert!(report.polarity < -0.1);
    }

    #[test]
    fn test_neutral_text() {
        let report = analyze_sentiment("The sky is blue. The grass is green.").unwrap();
        assert_eq!(report.sentiment, SentimentLabel::Neutral);
        assert_eq!(report.polarity, 0.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let report = analyze_sentiment("This is not good at all.").unwrap();
        assert_eq!(report.sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_intensifier_boosts() {
        let plain = analyze_sentiment("The food was good but the service was bad and bad.").unwrap();
        let boosted =
            analyze_sentiment("The food was very good but the service was bad and bad.").unwrap();
        assert!(boosted.polarity > plain.polarity);
    }

    #[test]
    fn test_emotion_scores() {
        let report = analyze_sentiment("I am so happy and excited, though a bit worried.").unwrap();
        let joy = report
            .emotion_scores
            .iter()
            .find(|(e, _)| e == "joy")
            .unwrap()
            .1;
        let fear = report
            .emotion_scores
            .iter()
            .find(|(e, _)| e == "fear")
            .unwrap()
            .1;
        assert!(joy > 0.0);
        assert!(fear > 0.0);
    }

    #[test]
    fn test_intensity_levels() {
        let high = analyze_sentiment("This is very very extremely good.").unwrap();
        assert_eq!(high.intensity.level, "High");
        let low = analyze_sentiment("This is slightly somewhat good.").unwrap();
        assert_eq!(low.intensity.level, "Low");
    }

    #[test]
    fn test_sentence_breakdown() {
        let report = analyze_sentiment("I love this. I hate that.").unwrap();
        assert_eq!(report.sentence_count, 2);
        assert_eq!(report.sentence_analysis[0].sentiment, SentimentLabel::Positive);
        assert_eq!(report.sentence_analysis[1].sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(analyze_sentiment("   ").is_err());
    }

    #[test]
    fn test_compare_skips_empty_and_ranks() {
        let texts = vec![
            "I love this wonderful product.".to_string(),
            "".to_string(),
            "This is a terrible disaster.".to_string(),
        ];
        let report = compare_sentiments(&texts);
        assert_eq!(report.total_texts, 2);
        assert_eq!(report.comparisons[0].text_id, 1);
        assert_eq!(report.comparisons[1].text_id, 3);
        assert_eq!(report.most_positive.unwrap().text_id, 1);
        assert_eq!(report.most_negative.unwrap().text_id, 3);
    }
}
