//! Accept/reject rule sets for admission control
//!
//! Each URL attribute the frontier filters on (host, port, link string,
//! extension) carries one [`RuleSet`]: an ordered list of accept patterns
//! and an ordered list of reject patterns. A value passes when it matches
//! at least one accept pattern (an empty accept list matches everything)
//! and matches no reject pattern.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A single rule pattern over a string-formed URL attribute
#[derive(Clone)]
pub enum Pattern {
    /// Exact equality with a literal value
    Literal(String),
    /// Regular-expression match against the value
    Regex(Regex),
    /// Membership in a fixed set of values
    AnyOf(HashSet<String>),
    /// Arbitrary predicate over the value
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Pattern {
    /// Builds a literal pattern
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Builds a regex pattern, failing on an invalid expression
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// Builds a set-membership pattern
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Builds a predicate pattern from a closure
    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Tests a value against this pattern
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Literal(literal) => value == literal,
            Self::Regex(regex) => regex.is_match(value),
            Self::AnyOf(set) => set.contains(value),
            Self::Predicate(f) => f(value),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Self::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            Self::AnyOf(set) => f.debug_tuple("AnyOf").field(set).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// An accept/reject pattern pair applied to one URL attribute
///
/// Policy: if `accept` is non-empty, a value must match at least one accept
/// pattern; if `reject` is non-empty, a value must match none. The two
/// checks are ANDed. A default (empty) rule set accepts everything.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    accept: Vec<Pattern>,
    reject: Vec<Pattern>,
}

impl RuleSet {
    /// Creates an empty rule set that accepts every value
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accept pattern (builder style)
    pub fn allow(mut self, pattern: Pattern) -> Self {
        self.accept.push(pattern);
        self
    }

    /// Adds a reject pattern (builder style)
    pub fn deny(mut self, pattern: Pattern) -> Self {
        self.reject.push(pattern);
        self
    }

    /// Appends an accept pattern
    pub fn push_accept(&mut self, pattern: Pattern) {
        self.accept.push(pattern);
    }

    /// Appends a reject pattern
    pub fn push_reject(&mut self, pattern: Pattern) {
        self.reject.push(pattern);
    }

    /// Tests a value against the combined accept/reject policy
    pub fn accepts(&self, value: &str) -> bool {
        let accepted = self.accept.is_empty() || matches_any(&self.accept, value);
        let rejected = matches_any(&self.reject, value);
        accepted && !rejected
    }

    /// Compiles a rule set from accept/reject regex pattern strings
    pub fn from_patterns(accept: &[String], reject: &[String]) -> Result<Self, regex::Error> {
        let mut rules = Self::new();
        for pattern in accept {
            rules.push_accept(Pattern::regex(pattern)?);
        }
        for pattern in reject {
            rules.push_reject(Pattern::regex(pattern)?);
        }
        Ok(rules)
    }
}

/// True iff any pattern in the list matches; vacuously false for an empty list
fn matches_any(patterns: &[Pattern], value: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = Pattern::literal("example.com");
        assert!(pattern.matches("example.com"));
        assert!(!pattern.matches("example.org"));
        assert!(!pattern.matches("sub.example.com"));
    }

    #[test]
    fn test_regex_pattern() {
        let pattern = Pattern::regex(r"\.example\.com$").unwrap();
        assert!(pattern.matches("blog.example.com"));
        assert!(!pattern.matches("example.org"));
    }

    #[test]
    fn test_regex_pattern_invalid() {
        assert!(Pattern::regex("(unclosed").is_err());
    }

    #[test]
    fn test_any_of_pattern() {
        let pattern = Pattern::any_of(["80", "443"]);
        assert!(pattern.matches("80"));
        assert!(pattern.matches("443"));
        assert!(!pattern.matches("8080"));
    }

    #[test]
    fn test_predicate_pattern() {
        let pattern = Pattern::predicate(|value| value.len() < 30);
        assert!(pattern.matches("http://a.com/"));
        assert!(!pattern.matches("http://a.com/a/very/long/path/indeed"));
    }

    #[test]
    fn test_empty_rule_set_accepts_everything() {
        let rules = RuleSet::new();
        assert!(rules.accepts("anything"));
        assert!(rules.accepts(""));
    }

    #[test]
    fn test_accept_list_requires_a_match() {
        let rules = RuleSet::new().allow(Pattern::literal("example.com"));
        assert!(rules.accepts("example.com"));
        assert!(!rules.accepts("example.org"));
    }

    #[test]
    fn test_empty_accept_means_all_with_rejects() {
        let rules = RuleSet::new().deny(Pattern::literal("bad.com"));
        assert!(rules.accepts("example.com"));
        assert!(rules.accepts("anything.org"));
        assert!(!rules.accepts("bad.com"));
    }

    #[test]
    fn test_reject_wins_over_accept() {
        let rules = RuleSet::new()
            .allow(Pattern::regex(r"\.com$").unwrap())
            .deny(Pattern::literal("spam.com"));
        assert!(rules.accepts("example.com"));
        assert!(!rules.accepts("spam.com"));
    }

    #[test]
    fn test_multiple_accept_patterns_or_together() {
        let rules = RuleSet::new()
            .allow(Pattern::literal("a.com"))
            .allow(Pattern::literal("b.com"));
        assert!(rules.accepts("a.com"));
        assert!(rules.accepts("b.com"));
        assert!(!rules.accepts("c.com"));
    }

    #[test]
    fn test_mixed_pattern_kinds() {
        let rules = RuleSet::new()
            .allow(Pattern::any_of(["example.com", "example.org"]))
            .deny(Pattern::predicate(|v| v.starts_with("example.o")));
        assert!(rules.accepts("example.com"));
        assert!(!rules.accepts("example.org"));
    }

    #[test]
    fn test_empty_value_is_ordinary() {
        // The empty extension must be matched like any other value
        let rules = RuleSet::new().allow(Pattern::literal(""));
        assert!(rules.accepts(""));
        assert!(!rules.accepts("pdf"));

        let rejecting = RuleSet::new().deny(Pattern::literal(""));
        assert!(!rejecting.accepts(""));
        assert!(rejecting.accepts("html"));
    }

    #[test]
    fn test_from_patterns_compiles_regexes() {
        let rules = RuleSet::from_patterns(
            &[r"^example\.com$".to_string()],
            &[r"^spam\.".to_string()],
        )
        .unwrap();
        assert!(rules.accepts("example.com"));
        assert!(!rules.accepts("spam.example.com"));
    }

    #[test]
    fn test_from_patterns_invalid_regex() {
        let result = RuleSet::from_patterns(&["(unclosed".to_string()], &[]);
        assert!(result.is_err());
    }
}
