// Question answering over a context document: classify the question,
// rank sentences by keyword relevance, extract a typed answer.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::{require_min_chars, AnalysisError, Result};
use crate::nlp::normalize::{sentences, tokenize, Stopwords};
use crate::nlp::phrases::noun_phrases;

/// Minimum context length for question answering, in characters.
pub const MIN_QA_CHARS: usize = 20;

const ANSWER_NOT_FOUND: &str = "I couldn't find relevant information in the provided context.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Who,
    What,
    When,
    Where,
    Why,
    How,
    General,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::Who => "who",
            QuestionType::What => "what",
            QuestionType::When => "when",
            QuestionType::Where => "where",
            QuestionType::Why => "why",
            QuestionType::How => "how",
            QuestionType::General => "general",
        };
        f.write_str(s)
    }
}

struct TypePatterns {
    kind: QuestionType,
    patterns: Vec<Regex>,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

// Classification order is fixed; the first matching category wins.
static QUESTION_PATTERNS: Lazy<Vec<TypePatterns>> = Lazy::new(|| {
    vec![
        TypePatterns {
            kind: QuestionType::Who,
            patterns: vec![
                re(r"\bwho\b"),
                re(r"\bperson\b"),
                re(r"\bpeople\b"),
                re(r"\bauthor\b"),
                re(r"\bwriter\b"),
            ],
        },
        TypePatterns {
            kind: QuestionType::What,
            patterns: vec![
                re(r"\bwhat\b"),
                re(r"\bthing\b"),
                re(r"\bobject\b"),
                re(r"\bitem\b"),
            ],
        },
        TypePatterns {
            kind: QuestionType::When,
            patterns: vec![
                re(r"\bwhen\b"),
                re(r"\btime\b"),
                re(r"\bdate\b"),
                re(r"\byear\b"),
                re(r"\bday\b"),
            ],
        },
        TypePatterns {
            kind: QuestionType::Where,
            patterns: vec![
                re(r"\bwhere\b"),
                re(r"\bplace\b"),
                re(r"\blocation\b"),
                re(r"\bcity\b"),
                re(r"\bcountry\b"),
            ],
        },
        TypePatterns {
            kind: QuestionType::Why,
            patterns: vec![
                re(r"\bwhy\b"),
                re(r"\breason\b"),
                re(r"\bcause\b"),
                re(r"\bbecause\b"),
            ],
        },
        TypePatterns {
            kind: QuestionType::How,
            patterns: vec![
                re(r"\bhow\b"),
                re(r"\bmethod\b"),
                re(r"\bway\b"),
                re(r"\bprocess\b"),
            ],
        },
    ]
});

// Typed answer extraction; only who/when/where have shape patterns.
static WHO_ANSWERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        re(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b"),
        re(r"\b(?:Dr|Mr|Mrs|Ms)\. [A-Z][a-z]+\b"),
        re(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b"),
    ]
});

static WHEN_ANSWERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        re(r"\b(?:19|20)\d{2}\b"),
        re(r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\b"),
        re(r"\b\d{1,2}(?:st|nd|rd|th)?\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\b"),
        re(r"\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b"),
        re(r"\b\d{1,2}:\d{2}(?:\s*(?:AM|PM))?\b"),
    ]
});

static WHERE_ANSWERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        re(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*(?:\s+(?:City|State|Country|Street|Avenue|Road|Boulevard))\b"),
        re(r"\bin\s+[A-Z][a-z]+\b"),
        re(r"\bat\s+[A-Z][a-z]+\b"),
    ]
});

// Question words and glue dropped before keyword matching.
static QA_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "what", "who", "when", "where", "why", "how", "is", "are", "was", "were", "the", "a",
        "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    ]
    .iter()
    .copied()
    .collect()
});

#[derive(Debug, Clone, Serialize)]
pub struct RankedSentence {
    pub sentence: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub confidence: f64,
    pub question_type: QuestionType,
    pub keywords: Vec<String>,
    pub relevant_sentences: Vec<RankedSentence>,
    pub context_length: usize,
}

/// First matching keyword category wins; no match is `General`.
pub fn classify_question(question: &str) -> QuestionType {
    let lower = question.to_lowercase();
    for set in QUESTION_PATTERNS.iter() {
        if set.patterns.iter().any(|p| p.is_match(&lower)) {
            return set.kind;
        }
    }
    QuestionType::General
}

/// Keywords for context matching: significant words plus noun phrases,
/// de-duplicated in first-seen order.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let stopwords = Stopwords::new();
    let mut keywords: Vec<String> = Vec::new();

    for word in tokenize(question) {
        if word.chars().count() > 2
            && !QA_STOP_WORDS.contains(word.as_str())
            && !keywords.contains(&word)
        {
            keywords.push(word);
        }
    }

    for phrase in noun_phrases(question, &stopwords) {
        if phrase.chars().count() > 2 && !keywords.contains(&phrase) {
            keywords.push(phrase);
        }
    }

    keywords
}

/// Scores every context sentence against the keywords and returns the
/// top `top_k`.
///
/// An exact keyword substring adds 2 points and each of the keyword's
/// whitespace-separated tokens adds 1 more, so multi-word keywords
/// count once for the phrase and once per constituent word. The total
/// is divided by the sentence's word count. Document order is not
/// preserved in the ranking.
pub fn rank_sentences(context: &str, keywords: &[String], top_k: usize) -> Vec<RankedSentence> {
    let mut scored: Vec<RankedSentence> = Vec::new();

    for sentence in sentences(context) {
        let lower = sentence.text.to_lowercase();
        let mut score = 0.0;

        for keyword in keywords {
            if lower.contains(keyword.as_str()) {
                score += 2.0;
            }
            for word in keyword.split_whitespace() {
                if lower.contains(word) {
                    score += 1.0;
                }
            }
        }

        let words = sentence.text.split_whitespace().count();
        if words > 0 {
            score /= words as f64;
        }
        scored.push(RankedSentence {
            sentence: sentence.text,
            score,
        });
    }

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

fn extract_answer_by_type(ranked: &[RankedSentence], kind: QuestionType) -> String {
    let joined = ranked
        .iter()
        .map(|r| r.sentence.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let patterns: &[Regex] = match kind {
        QuestionType::Who => WHO_ANSWERS.as_slice(),
        QuestionType::When => WHEN_ANSWERS.as_slice(),
        QuestionType::Where => WHERE_ANSWERS.as_slice(),
        _ => &[],
    };

    for pattern in patterns {
        if let Some(m) = pattern.find(&joined) {
            return m.as_str().to_string();
        }
    }

    ranked
        .first()
        .map(|r| r.sentence.clone())
        .unwrap_or_else(|| "No specific answer found.".to_string())
}

/// Answers a question from the context document.
pub fn answer_question(question: &str, context: &str) -> Result<Answer> {
    if question.trim().is_empty() {
        return Err(AnalysisError::config("a question is required"));
    }
    require_min_chars(context, MIN_QA_CHARS)?;

    let question_type = classify_question(question);
    let keywords = extract_keywords(question);
    let ranked = rank_sentences(context, &keywords, 3);

    if ranked.is_empty() {
        return Ok(Answer {
            answer: ANSWER_NOT_FOUND.to_string(),
            confidence: 0.1,
            question_type,
            keywords,
            relevant_sentences: ranked,
            context_length: context.len(),
        });
    }

    let answer = match question_type {
        QuestionType::Who | QuestionType::When | QuestionType::Where => {
            extract_answer_by_type(&ranked, question_type)
        }
        _ => {
            let mut answer = ranked[0].sentence.clone();
            if ranked.len() > 1 && answer.split_whitespace().count() < 15 {
                answer.push(' ');
                answer.push_str(&ranked[1].sentence);
            }
            answer
        }
    };

    let confidence = (ranked[0].score * 2.0).min(1.0);

    Ok(Answer {
        answer,
        confidence,
        question_type,
        keywords,
        relevant_sentences: ranked,
        context_length: context.len(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiAnswerItem {
    pub question_id: usize,
    pub question: String,
    pub answer: String,
    pub confidence: f64,
    pub question_type: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MultiAnswerReport {
    pub results: Vec<MultiAnswerItem>,
    pub total_questions: usize,
    pub successful_answers: usize,
    pub average_confidence: f64,
}

/// Answers several questions against one context.
///
/// Items are independent: a failure is recorded in place with zero
/// confidence and never aborts the remaining questions. Questions of
/// three characters or fewer are skipped.
pub fn answer_multiple(questions: &[String], context: &str) -> MultiAnswerReport {
    let mut results = Vec::new();

    for (i, question) in questions.iter().enumerate() {
        if question.trim().chars().count() <= 3 {
            continue;
        }
        match answer_question(question, context) {
            Ok(answer) => results.push(MultiAnswerItem {
                question_id: i + 1,
                question: question.clone(),
                answer: answer.answer,
                confidence: answer.confidence,
                question_type: answer.question_type.to_string(),
                error: None,
            }),
            Err(e) => results.push(MultiAnswerItem {
                question_id: i + 1,
                question: question.clone(),
                answer: format!("Error: {e}"),
                confidence: 0.0,
                question_type: "error".to_string(),
                error: Some(e.to_string()),
            }),
        }
    }

    let successful = results.iter().filter(|r| r.confidence > 0.3).count();
    let average = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64
    };

    MultiAnswerReport {
        total_questions: questions.len(),
        successful_answers: successful,
        average_confidence: average,
        results,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextAnalysis {
    pub sentences: usize,
    pub proper_nouns: usize,
    pub noun_phrases: usize,
    pub years_found: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuestions {
    pub questions: Vec<String>,
    pub context_analysis: ContextAnalysis,
}

static YEAR: Lazy<Regex> = Lazy::new(|| re(r"\b(?:19|20)\d{2}\b"));
static CAPITALIZED: Lazy<Regex> = Lazy::new(|| re(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b"));

/// Proposes questions the context could answer.
pub fn generate_questions(context: &str, num_questions: usize) -> Result<GeneratedQuestions> {
    require_min_chars(context, MIN_QA_CHARS)?;
    let sents = sentences(context);
    if sents.len() < 2 {
        return Err(AnalysisError::extraction(
            "need at least two sentences to generate questions",
        ));
    }

    let stopwords = Stopwords::new();
    let lower = context.to_lowercase();

    let proper_nouns: Vec<&str> = CAPITALIZED
        .find_iter(context)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 2)
        .collect();
    let distinct_proper: HashSet<&str> = proper_nouns.iter().copied().collect();
    let phrases = noun_phrases(context, &stopwords);
    let years = YEAR.find_iter(context).count();

    let mut questions = Vec::new();
    if let Some(first) = proper_nouns.first() {
        questions.push(format!("Who is {first}?"));
    }
    for phrase in phrases.iter().take(2) {
        questions.push(format!("What is {phrase}?"));
    }
    if years > 0 {
        questions.push("When did this happen?".to_string());
    }
    if !proper_nouns.is_empty() {
        questions.push("Where did this take place?".to_string());
    }
    if ["because", "reason", "cause"].iter().any(|w| lower.contains(w)) {
        questions.push("Why did this happen?".to_string());
    }
    if ["method", "process", "way", "procedure"]
        .iter()
        .any(|w| lower.contains(w))
    {
        questions.push("How does this work?".to_string());
    }
    questions.truncate(num_questions);

    Ok(GeneratedQuestions {
        questions,
        context_analysis: ContextAnalysis {
            sentences: sents.len(),
            proper_nouns: distinct_proper.len(),
            noun_phrases: phrases.len(),
            years_found: years,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EINSTEIN: &str =
        "Albert Einstein was born in 1879. He developed the theory of relativity.";

    #[test]
    fn test_classify_question_types() {
        assert_eq!(classify_question("Who wrote this?"), QuestionType::Who);
        assert_eq!(classify_question("What is going on?"), QuestionType::What);
        assert_eq!(classify_question("When was Einstein born?"), QuestionType::When);
        assert_eq!(classify_question("Where is the office?"), QuestionType::Where);
        assert_eq!(classify_question("Why did it fail?"), QuestionType::Why);
        assert_eq!(classify_question("How does this work?"), QuestionType::How);
        assert_eq!(classify_question("Tell me more."), QuestionType::General);
    }

    #[test]
    fn test_first_category_wins() {
        // Mentions both a person and a date; who comes first in the
        // fixed order.
        assert_eq!(
            classify_question("Who set the date?"),
            QuestionType::Who
        );
    }

    #[test]
    fn test_einstein_when_answer() {
        let result = answer_question("When was Einstein born?", EINSTEIN).unwrap();
        assert_eq!(result.question_type, QuestionType::When);
        assert_eq!(result.answer, "1879");
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_keywords_drop_question_words() {
        let keywords = extract_keywords("When was Einstein born?");
        assert!(keywords.contains(&"einstein".to_string()));
        assert!(keywords.contains(&"born".to_string()));
        assert!(!keywords.iter().any(|k| k == "when" || k == "was"));
    }

    #[test]
    fn test_multiword_keyword_double_counts() {
        let keywords = vec!["theory of relativity".to_string()];
        let ranked = rank_sentences(
            "He developed the theory of relativity.",
            &keywords,
            3,
        );
        // 2 for the phrase plus 1 per matching constituent word, over
        // 6 words.
        assert!((ranked[0].score - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_general_answer_concatenates_short_top_sentence() {
        let result = answer_question("What did Einstein develop?", EINSTEIN).unwrap();
        assert_eq!(result.question_type, QuestionType::What);
        assert!(result.answer.contains("theory of relativity"));
    }

    #[test]
    fn test_context_too_short() {
        let err = answer_question("Who?", "Tiny context.").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InputTooShort { required: 20, .. }
        ));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let questions = vec![
            "When was Einstein born?".to_string(),
            "".to_string(),
            "What did he develop?".to_string(),
        ];
        let report = answer_multiple(&questions, EINSTEIN);
        assert_eq!(report.total_questions, 3);
        // The empty question is skipped; both real ones still answer.
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].question_id, 1);
        assert_eq!(report.results[1].question_id, 3);
        assert!(report.results.iter().all(|r| r.error.is_none()));
    }

    #[test]
    fn test_batch_records_item_errors_in_place() {
        let questions = vec!["What happened?".to_string()];
        let report = answer_multiple(&questions, "short");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].confidence, 0.0);
        assert!(report.results[0].error.is_some());
    }

    #[test]
    fn test_generate_questions() {
        let result = generate_questions(EINSTEIN, 5).unwrap();
        assert!(result.questions.iter().any(|q| q == "Who is Albert Einstein?"));
        assert!(result.questions.iter().any(|q| q == "When did this happen?"));
        assert!(result.context_analysis.years_found == 1);
        assert!(result.questions.len() <= 5);
    }

    #[test]
    fn test_generate_questions_needs_two_sentences() {
        let err = generate_questions("One single sentence only here.", 5).unwrap_err();
        assert!(matches!(err, AnalysisError::ExtractionFailure(_)));
    }
}
