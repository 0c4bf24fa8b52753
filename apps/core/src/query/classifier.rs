//! Query classification using regex patterns.
//!
//! A query is complex when it reads like a trip brief (a day count with a
//! travel phrasing, or one of the thematic keywords) and needs the analysis
//! modal to disambiguate. Anything else is a plain destination lookup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Routing decision for a submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClass {
    /// Direct listing lookup against the destination search endpoint.
    Simple,
    /// Multi-step disambiguation through the analysis service.
    Complex,
}

impl fmt::Display for QueryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryClass::Simple => write!(f, "simple"),
            QueryClass::Complex => write!(f, "complex"),
        }
    }
}

/// A named pattern that marks a query as complex.
struct ComplexRule {
    name: &'static str,
    pattern: Regex,
}

impl ComplexRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid regex: complex query rule"),
        }
    }
}

// Compile patterns once at startup, evaluated in order
static COMPLEX_RULES: LazyLock<Vec<ComplexRule>> = LazyLock::new(|| {
    vec![
        // Day-count trip phrasing
        ComplexRule::new("days_travel", r"(?i)\d+\s*days?\s*travel"),
        ComplexRule::new("days_in", r"(?i)\d+\s*days?\s*in"),
        ComplexRule::new("days_and", r"(?i)\d+\s*days?\s*and"),
        ComplexRule::new("days_for", r"(?i)\d+\s*days?\s*for"),
        // Themes
        ComplexRule::new("spirituality", r"(?i)spirituality|spiritual"),
        ComplexRule::new("yoga_ayurveda", r"(?i)yoga|ayurveda"),
        ComplexRule::new("miniature_painting", r"(?i)miniature\s*painting"),
        ComplexRule::new("learning", r"(?i)learn|workshop|training"),
        ComplexRule::new("desert_palace", r"(?i)desert\s*palace"),
        ComplexRule::new("golden_triangle", r"(?i)golden\s*triangle"),
        ComplexRule::new("honeymoon", r"(?i)honeymoon"),
        ComplexRule::new("adventure", r"(?i)adventure"),
        ComplexRule::new("luxury", r"(?i)luxury"),
        ComplexRule::new("heritage", r"(?i)heritage"),
        ComplexRule::new("holiday_days", r"(?i)holiday.*days|days.*holiday"),
    ]
});

/// Classifier over the ordered complex-query rules.
///
/// Stateless: every call evaluates the rules against the string it is given,
/// so the caller must classify the query as it stands at submission time.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// `Complex` if any rule matches, `Simple` otherwise.
    pub fn classify(&self, query: &str) -> QueryClass {
        if COMPLEX_RULES.iter().any(|rule| rule.pattern.is_match(query)) {
            QueryClass::Complex
        } else {
            QueryClass::Simple
        }
    }

    /// Names of every rule the query matches, in rule order.
    pub fn matched_rules(&self, query: &str) -> Vec<&'static str> {
        COMPLEX_RULES
            .iter()
            .filter(|rule| rule.pattern.is_match(query))
            .map(|rule| rule.name)
            .collect()
    }

    /// Names of all rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        COMPLEX_RULES.iter().map(|rule| rule.name).collect()
    }
}

/// Shorthand for `QueryClassifier::new().classify(query)`.
pub fn classify(query: &str) -> QueryClass {
    QueryClassifier.classify(query)
}
