//! Minimal text normalisation for article abstracts and bodies.
//!
//! tokenize → strip reference markers (body only) → remove stop words

use oanlp_common::Document;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Characters trimmed from both ends of every token. Brackets are kept so that
/// citation markers like `[12]` survive until `strip_reference_markers`.
pub const TOKEN_PUNCTUATION: &[char] = &['.', ':', ';', '(', ')', ',', '?', '+', '\\', '/', '!', '"', '\''];

/// Characters replaced by a space when cleaning a field for CSV export.
pub const EXPORT_PUNCTUATION: &[char] = &['.', ':', ';', '(', ')', ',', '?', '+', '\\', '/'];

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

fn reference_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[\d+\]$").unwrap_or_else(|_| unreachable!()))
}

/// Word lists and counts derived from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalisedDocument {
    pub id: String,
    pub abstract_word_list: Vec<String>,
    pub abstract_word_counts: HashMap<String, usize>,
    pub body_word_list: Vec<String>,
    pub body_word_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct TextNormaliser {
    stop_words: HashSet<String>,
}

impl TextNormaliser {
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_STOP_WORDS.iter().copied())
    }

    /// Stop words are matched lowercased.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|raw| raw.trim_matches(TOKEN_PUNCTUATION).to_lowercase())
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Drop bracketed numeric citations such as `[3]`.
    pub fn strip_reference_markers(&self, tokens: Vec<String>) -> Vec<String> {
        let re = reference_marker_regex();
        tokens.into_iter().filter(|t| !re.is_match(t)).collect()
    }

    pub fn remove_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.into_iter().filter(|t| !self.is_stop_word(t)).collect()
    }

    pub fn normalize_document(&self, doc: &Document) -> NormalisedDocument {
        let abstract_text = doc.abstract_text.join(" ");
        let abstract_word_list = self.remove_stopwords(self.tokenize(&abstract_text));
        let body_word_list =
            self.remove_stopwords(self.strip_reference_markers(self.tokenize(&doc.body)));

        NormalisedDocument {
            id: doc.id.clone(),
            abstract_word_counts: word_counts(&abstract_word_list),
            body_word_counts: word_counts(&body_word_list),
            abstract_word_list,
            body_word_list,
        }
    }
}

impl Default for TextNormaliser {
    fn default() -> Self {
        Self::new()
    }
}

pub fn word_counts(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Flatten a field onto one line: newlines and export punctuation become spaces.
pub fn clean_field(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || EXPORT_PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
