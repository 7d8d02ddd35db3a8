//! Table-driven keyword classification.
//!
//! Keywords match case-insensitively as whole tokens: `thanks` matches
//! "Thanks!" but not "thanksgiving". Multi-word phrases such as `thank you`
//! are allowed.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use wrapped_core::config::KeywordConfig;

/// Counts occurrences of any keyword from one set.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let mut seen = HashSet::new();
        let patterns = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .filter_map(|k| match Regex::new(&token_pattern(&k)) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(keyword = %k, error = %e, "Dropping unusable keyword");
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// Number of keyword occurrences in `text`.
    pub fn count(&self, text: &str) -> u32 {
        self.patterns
            .iter()
            .map(|re| re.find_iter(text).count() as u32)
            .sum()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Word boundaries only make sense next to word characters, so keywords such
/// as `c++` get a boundary on the leading side only.
fn token_pattern(keyword: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if keyword.starts_with(is_word) { r"\b" } else { "" };
    let trail = if keyword.ends_with(is_word) { r"\b" } else { "" };
    format!("(?i){}{}{}", lead, regex::escape(keyword), trail)
}

/// Sentiment and topic classifier built from the keyword tables.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    swear: KeywordMatcher,
    gratitude: KeywordMatcher,
    topics: Vec<(String, KeywordMatcher)>,
}

impl KeywordClassifier {
    pub fn from_config(config: &KeywordConfig) -> Self {
        Self {
            swear: KeywordMatcher::new(config.swear.as_slice()),
            gratitude: KeywordMatcher::new(config.gratitude.as_slice()),
            topics: config
                .topics
                .iter()
                .map(|(label, words)| (label.clone(), KeywordMatcher::new(words.as_slice())))
                .collect(),
        }
    }

    pub fn swear_count(&self, text: &str) -> u32 {
        self.swear.count(text)
    }

    pub fn gratitude_count(&self, text: &str) -> u32 {
        self.gratitude.count(text)
    }

    /// Keyword occurrences per topic in `text`, in label order. Topics with
    /// no occurrence are left out.
    pub fn topic_counts<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (&'a str, u32)> + 'a {
        self.topics
            .iter()
            .map(move |(label, matcher)| (label.as_str(), matcher.count(text)))
            .filter(|(_, count)| *count > 0)
    }

    /// A zeroed distribution containing every configured topic.
    pub fn empty_distribution(&self) -> BTreeMap<String, u32> {
        self.topics
            .iter()
            .map(|(label, _)| (label.clone(), 0))
            .collect()
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::from_config(&KeywordConfig::default())
    }
}
