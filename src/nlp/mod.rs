// NLP modules for textlens
pub mod chunker;
pub mod classify;
pub mod frequency;
pub mod generate;
pub mod merge;
pub mod ner;
pub mod normalize;
pub mod phrases;
pub mod qa;
pub mod relations;
pub mod sentiment;
pub mod summarization;

pub use classify::classify_text;
pub use merge::extract_entities;
pub use qa::answer_question;
pub use sentiment::analyze_sentiment;
pub use summarization::extractive_summarize;
