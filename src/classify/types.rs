//! Category types
//!
//! Core types for incident classification. No matching logic here,
//! only the label set and the classifier error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Incident category labels
///
/// A closed set: every classification result is one of these, with
/// `Other` as the fallback. Serialized and persisted as the label text
/// (e.g. "Network Issue").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Network Issue")]
    NetworkIssue,
    #[serde(rename = "Server Issue")]
    ServerIssue,
    #[serde(rename = "Software Issue")]
    SoftwareIssue,
    #[serde(rename = "Login Issue")]
    LoginIssue,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// All labels. `Other` stays last: it is the fallback, never a match target.
    pub const ALL: [Category; 5] = [
        Category::NetworkIssue,
        Category::ServerIssue,
        Category::SoftwareIssue,
        Category::LoginIssue,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NetworkIssue => "Network Issue",
            Category::ServerIssue => "Server Issue",
            Category::SoftwareIssue => "Software Issue",
            Category::LoginIssue => "Login Issue",
            Category::Other => "Other",
        }
    }

    /// Parse exact label text back into the set. Returns `None` for
    /// anything outside it, which callers treat as a contract violation.
    pub fn parse(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors from the model-backed classification path.
///
/// The keyword strategy is total and never produces these.
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    #[error("network error: {0}")]
    Network(String),
    #[error("inference backend returned status {0}")]
    Server(u16),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("label {0:?} is not in the category set")]
    OutOfSet(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_label() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_labels() {
        assert_eq!(Category::parse("Hardware Issue"), None);
        assert_eq!(Category::parse("network issue"), None); // exact text only
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_serializes_as_label_text() {
        let json = serde_json::to_string(&Category::NetworkIssue).unwrap();
        assert_eq!(json, "\"Network Issue\"");
    }
}
