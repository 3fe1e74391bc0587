//! textlens: rule-based text analysis.
//!
//! Entity extraction merges two sources per document: ordered regex
//! pattern sets with exact offsets, and a lower-confidence proper-noun
//! chunker. Summarization, question answering, sentiment, and
//! classification all run over the same normalization and
//! frequency-scoring primitives. Everything is synchronous and pure;
//! session state and translation providers live behind explicit seams
//! owned by the caller.

pub mod error;
pub mod export;
pub mod nlp;
pub mod session;
pub mod translate;

pub use error::{AnalysisError, Result};
