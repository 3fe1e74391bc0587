// Error types shared across the analysis modules.
use thiserror::Error;

/// Result type for textlens operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Non-fatal error surfaced to the caller as a structured value.
///
/// Analysis functions never panic on user input; everything they can't
/// handle comes back through one of these variants.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnalysisError {
    /// Input text is below the feature's minimum length.
    #[error("input too short: need at least {required} characters, got {actual}")]
    InputTooShort { required: usize, actual: usize },

    /// An extraction stage could not run; callers usually degrade to
    /// empty results instead of propagating this.
    #[error("extraction failed: {0}")]
    ExtractionFailure(String),

    /// The translation collaborator reported an error.
    #[error("translation failed: {0}")]
    TranslationFailure(String),

    /// The language-detection collaborator reported an error.
    #[error("language detection failed: {0}")]
    DetectionFailure(String),

    /// Invalid or missing configuration (bad regex, no patterns, no
    /// target languages, unsupported input file).
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl AnalysisError {
    pub fn too_short(required: usize, actual: usize) -> Self {
        AnalysisError::InputTooShort { required, actual }
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        AnalysisError::ExtractionFailure(msg.into())
    }

    pub fn translation(msg: impl Into<String>) -> Self {
        AnalysisError::TranslationFailure(msg.into())
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        AnalysisError::DetectionFailure(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AnalysisError::ConfigurationError(msg.into())
    }
}

/// Checks the trimmed length of `text` against a feature minimum.
pub fn require_min_chars(text: &str, required: usize) -> Result<()> {
    let actual = text.trim().chars().count();
    if actual < required {
        return Err(AnalysisError::too_short(required, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_min_chars() {
        assert!(require_min_chars("hello world", 10).is_ok());
        let err = require_min_chars("hi", 10).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InputTooShort {
                required: 10,
                actual: 2
            }
        );
    }

    #[test]
    fn test_trimmed_length_is_used() {
        assert!(require_min_chars("   abc   ", 5).is_err());
    }
}
