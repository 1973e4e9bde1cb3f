//! Sentence extraction from article body text.
//!
//! Body text is segmented with the Unicode sentence-boundary rules (UAX #29)
//! and each trimmed sentence is kept when it contains any configured keyword,
//! compared case-insensitively as a plain substring.

use itertools::Itertools;
use unicode_segmentation::UnicodeSegmentation;

/// Case-insensitive substring matcher over a fixed keyword set.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
}

impl KeywordMatcher {
    /// Keywords are lowercased, trimmed and deduplicated; empty ones are dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .unique()
            .collect();
        Self { keywords }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Split text into trimmed sentences, in order.
///
/// Segments without any alphanumeric character (stray punctuation, blank
/// lines) are not sentences and are left out.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Sentences of `body` that mention a keyword, trimmed, in body order.
pub fn relevant_sentences(body: &str, matcher: &KeywordMatcher) -> Vec<String> {
    split_sentences(body)
        .into_iter()
        .filter(|s| matcher.matches(s))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_matching_sentence_only() {
        let matcher = KeywordMatcher::new(["black"]);
        let body = "This is about black history. This is unrelated.";
        assert_eq!(
            relevant_sentences(body, &matcher),
            vec!["This is about black history."]
        );
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let matcher = KeywordMatcher::new(["african", "black"]);
        assert!(matcher.matches("African American patients were enrolled."));
        assert!(matcher.matches("BLACK women face higher risk."));
        assert!(matcher.matches("Rates among bLaCk adults rose."));
        assert!(!matcher.matches("Asthma rates fell overall."));
    }

    #[test]
    fn test_keyword_is_substring_match() {
        let matcher = KeywordMatcher::new(["black"]);
        assert!(matcher.matches("Blackberries are rich in fiber."));
    }

    #[test]
    fn test_matcher_normalizes_keywords() {
        let matcher = KeywordMatcher::new(["  Black ", "black", "", "AFRICAN"]);
        assert_eq!(matcher.keywords(), &["black".to_string(), "african".to_string()]);
    }

    #[test]
    fn test_order_preserved_across_paragraphs() {
        let matcher = KeywordMatcher::new(["african"]);
        let body = "African diets vary.\n\nNothing here.\nStudies of African Americans show gaps.  ";
        assert_eq!(
            relevant_sentences(body, &matcher),
            vec![
                "African diets vary.",
                "Studies of African Americans show gaps."
            ]
        );
    }

    #[test]
    fn test_split_sentences_trims_and_drops_empty() {
        let sentences = split_sentences("  First one.   Second one?  Third!\n");
        assert_eq!(sentences, vec!["First one.", "Second one?", "Third!"]);
    }

    #[test]
    fn test_abbreviation_before_capital_ends_sentence() {
        // Unicode boundaries do not know abbreviations: "Dr." followed by a
        // capitalized word closes the sentence.
        assert_eq!(
            split_sentences("See Dr. Smith today. He is kind."),
            vec!["See Dr.", "Smith today.", "He is kind."]
        );
        let matcher = KeywordMatcher::new(["black"]);
        assert_eq!(
            relevant_sentences("We met Dr. Black at noon.", &matcher),
            vec!["Black at noon."]
        );
    }

    #[test]
    fn test_empty_body() {
        let matcher = KeywordMatcher::new(["black"]);
        assert!(relevant_sentences("", &matcher).is_empty());
    }
}
