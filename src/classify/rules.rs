//! Keyword Classification Rules
//!
//! The ordered rule table for the keyword strategy.
//! No matching logic here, only the table and the fallback.

use super::types::Category;

/// Ordered (substring, label) rules. First match wins, so the order is
/// load-bearing: a description containing both "network" and "server"
/// resolves to Network Issue because that rule is listed first.
pub const KEYWORD_RULES: &[(&str, Category)] = &[
    ("network", Category::NetworkIssue),
    ("server", Category::ServerIssue),
    ("software", Category::SoftwareIssue),
    ("login", Category::LoginIssue),
];

/// Label assigned when no rule matches.
pub const FALLBACK: Category = Category::Other;
