//! Keyword Classifier
//!
//! Deterministic substring matching against the ordered rule table.

use super::rules::{FALLBACK, KEYWORD_RULES};
use super::types::Category;

/// Keyword-rule classification engine.
///
/// Case-insensitive substring search over `KEYWORD_RULES`, first matching
/// rule wins. Total over all inputs: text matching no rule (including
/// empty text) falls back to `Category::Other`. Identical input always
/// yields identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn classify(&self, description: &str) -> Category {
        let lower = description.to_lowercase();

        for (keyword, category) in KEYWORD_RULES {
            if lower.contains(keyword) {
                return *category;
            }
        }

        FALLBACK
    }
}
