// Translation capability seam. The concrete provider is an external
// collaborator; the core only defines the interface and the batch
// fan-out with per-item failure isolation.
use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Detected language with the provider's confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub language: String,
    pub confidence: f64,
}

/// A translation provider. One interface regardless of backend;
/// implementations surface their failures as
/// [`AnalysisError::TranslationFailure`] / [`AnalysisError::DetectionFailure`].
pub trait Translator {
    fn detect_language(&self, text: &str) -> Result<Detection>;

    /// Translates `text` into `target`; `source` of `None` means
    /// auto-detect.
    fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationItem {
    pub target: String,
    pub translated: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchTranslation {
    pub items: Vec<TranslationItem>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Translates one text into several target languages.
///
/// Items are independent: a provider failure for one target is
/// recorded beside the successes and never aborts the rest. Output
/// preserves the input target order.
pub fn translate_to_many(
    translator: &dyn Translator,
    text: &str,
    targets: &[String],
) -> Result<BatchTranslation> {
    if targets.is_empty() {
        return Err(AnalysisError::config("no target languages selected"));
    }

    let mut items = Vec::with_capacity(targets.len());
    for target in targets {
        match translator.translate(text, None, target) {
            Ok(translated) => items.push(TranslationItem {
                target: target.clone(),
                translated: Some(translated),
                error: None,
            }),
            Err(e) => items.push(TranslationItem {
                target: target.clone(),
                translated: None,
                error: Some(e.to_string()),
            }),
        }
    }

    let succeeded = items.iter().filter(|i| i.error.is_none()).count();
    Ok(BatchTranslation {
        failed: items.len() - succeeded,
        succeeded,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTranslator;

    impl Translator for FakeTranslator {
        fn detect_language(&self, text: &str) -> Result<Detection> {
            if text.is_empty() {
                return Err(AnalysisError::detection("empty text"));
            }
            Ok(Detection {
                language: "en".to_string(),
                confidence: 0.95,
            })
        }

        fn translate(&self, text: &str, _source: Option<&str>, target: &str) -> Result<String> {
            if target == "xx" {
                return Err(AnalysisError::translation("unsupported target"));
            }
            Ok(format!("[{target}] {text}"))
        }
    }

    #[test]
    fn test_detect() {
        let detection = FakeTranslator.detect_language("hello there").unwrap();
        assert_eq!(detection.language, "en");
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let targets = vec!["de".to_string(), "xx".to_string(), "fr".to_string()];
        let batch = translate_to_many(&FakeTranslator, "hello", &targets).unwrap();
        assert_eq!(batch.items.len(), 3);
        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.items[0].translated.as_deref(), Some("[de] hello"));
        assert!(batch.items[1].error.is_some());
        assert_eq!(batch.items[2].translated.as_deref(), Some("[fr] hello"));
    }

    #[test]
    fn test_no_targets_is_a_configuration_error() {
        let err = translate_to_many(&FakeTranslator, "hello", &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigurationError(_)));
    }
}
