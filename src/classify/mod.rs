//! Incident Classification
//!
//! Maps a free-text incident description to one label from a fixed
//! category set. This is the core of the system: two interchangeable
//! strategies behind a single dispatching type, plus the background
//! trigger that runs classification after an incident is created.
//!
//! ## Structure
//! - `types`: the `Category` label set and `ClassifyError`
//! - `rules`: the ordered keyword rule table
//! - `keyword`: deterministic substring-matching engine
//! - `zero_shot`: model-backed engine over an HTTP inference endpoint
//! - `trigger`: fire-and-forget queue, worker, and store write-back

pub mod keyword;
pub mod rules;
pub mod trigger;
pub mod types;
pub mod zero_shot;

pub use keyword::KeywordClassifier;
pub use trigger::{spawn_worker, ClassifyJob, ClassifyQueue};
pub use types::{Category, ClassifyError};
pub use zero_shot::ZeroShotClassifier;

use std::time::Duration;

use crate::config::Config;

/// Classification strategies. Selected once at startup from config;
/// callers must not depend on which one is active.
pub enum Classifier {
    Keyword(KeywordClassifier),
    ZeroShot(ZeroShotClassifier),
}

impl Classifier {
    /// Build the backend selected by `CLASSIFIER_BACKEND`.
    pub fn from_config(config: &Config) -> Self {
        match config.classifier_backend.as_str() {
            "zero-shot" => Classifier::ZeroShot(ZeroShotClassifier::new(
                config.inference_url.clone(),
                Duration::from_secs(config.inference_timeout_secs),
            )),
            "keyword" => Classifier::Keyword(KeywordClassifier),
            other => {
                tracing::warn!("Unknown CLASSIFIER_BACKEND '{}', using keyword rules", other);
                Classifier::Keyword(KeywordClassifier)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Classifier::Keyword(_) => "keyword",
            Classifier::ZeroShot(_) => "zero-shot",
        }
    }

    /// Classify a description into exactly one label from the fixed set.
    ///
    /// The keyword arm is total and never returns an error; only the
    /// model-backed arm can fail.
    pub async fn classify(&self, description: &str) -> Result<Category, ClassifyError> {
        match self {
            Classifier::Keyword(engine) => Ok(engine.classify(description)),
            Classifier::ZeroShot(engine) => engine.classify(description).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_dispatch_is_total() {
        let classifier = Classifier::Keyword(KeywordClassifier);
        assert_eq!(classifier.name(), "keyword");

        let category = tokio_test::block_on(classifier.classify("Server not responding")).unwrap();
        assert_eq!(category, Category::ServerIssue);
    }

    #[test]
    fn test_unknown_backend_falls_back_to_keyword() {
        let config = Config {
            classifier_backend: "llm".to_string(),
            ..Config::from_env()
        };
        assert_eq!(Classifier::from_config(&config).name(), "keyword");
    }
}
