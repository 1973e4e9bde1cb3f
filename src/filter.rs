//! Optional second-stage filter applied to matched sentences.
//!
//! The pipeline only depends on the [`SentenceFilter`] contract. [`RuleFilter`]
//! is the implementation wired to `--filter`; closures also implement the
//! trait, which is what the tests use.

use crate::config::FilterRules;
use regex::Regex;
use std::error::Error;

/// Decide whether a keyword-matched sentence is written out.
pub trait SentenceFilter {
    fn should_select(&self, sentence: &str) -> bool;
}

impl<F> SentenceFilter for F
where
    F: Fn(&str) -> bool,
{
    fn should_select(&self, sentence: &str) -> bool {
        self(sentence)
    }
}

/// Filter built from [`FilterRules`]: drops short sentences and sentences
/// matching an exclusion pattern.
#[derive(Debug, Clone)]
pub struct RuleFilter {
    min_words: usize,
    exclude: Vec<Regex>,
}

impl RuleFilter {
    pub fn from_rules(rules: &FilterRules) -> Result<Self, Box<dyn Error>> {
        let exclude = rules
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| format!("bad exclude pattern {p:?}: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            min_words: rules.min_words,
            exclude,
        })
    }
}

impl SentenceFilter for RuleFilter {
    fn should_select(&self, sentence: &str) -> bool {
        sentence.split_whitespace().count() >= self.min_words
            && !self.exclude.iter().any(|re| re.is_match(sentence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_select_everything() {
        let filter = RuleFilter::from_rules(&FilterRules::default()).unwrap();
        assert!(filter.should_select("Black."));
        assert!(filter.should_select(""));
    }

    #[test]
    fn test_min_words() {
        let rules = FilterRules {
            min_words: 4,
            exclude_patterns: vec![],
        };
        let filter = RuleFilter::from_rules(&rules).unwrap();
        assert!(!filter.should_select("Black beans."));
        assert!(filter.should_select("Black beans are nutritious."));
    }

    #[test]
    fn test_exclude_patterns() {
        let rules = FilterRules {
            min_words: 0,
            exclude_patterns: vec!["(?i)black (pepper|beans|tea)".to_string()],
        };
        let filter = RuleFilter::from_rules(&rules).unwrap();
        assert!(!filter.should_select("Add Black Pepper to taste."));
        assert!(filter.should_select("Black patients had worse outcomes."));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let rules = FilterRules {
            min_words: 0,
            exclude_patterns: vec!["(unclosed".to_string()],
        };
        assert!(RuleFilter::from_rules(&rules).is_err());
    }

    #[test]
    fn test_closure_filter() {
        let filter = |s: &str| s.contains("history");
        assert!(filter.should_select("Black history month."));
        assert!(!filter.should_select("Black beans."));
    }
}
