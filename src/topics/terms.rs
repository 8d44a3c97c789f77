//! Title tokenization into candidate topic terms.
//!
//! A title such as `"Robot Dance Goes Viral"` becomes the phrases
//! `"robot dance"`, `"dance goes"`, `"goes viral"` followed by the unigrams
//! `"robot"`, `"dance"`, `"viral"`. Phrases come from every adjacent pair of
//! surviving tokens; unigrams only from tokens of five or more characters.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

/// Function words and headline boilerplate that never make useful topics.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "his", "him", "how", "its", "may", "who", "why", "what",
    "when", "where", "which", "with", "from", "this", "that", "than", "then", "them", "they",
    "their", "there", "these", "those", "into", "over", "after", "before", "about", "amid",
    "more", "most", "will", "would", "could", "should", "been", "being", "were", "just", "also",
    "says", "said", "report", "reports", "update", "updates", "news", "live", "watch", "video",
    "new", "latest", "today", "learns", "reveals", "announces", "finds", "gets",
];

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos);").expect("valid entity regex")
});

/// Decode numeric, hex and the five XML named entities.
///
/// Anything else, including malformed or out-of-range references, is left as is.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = if let Some(hex) = body
                        .strip_prefix("#x")
                        .or_else(|| body.strip_prefix("#X"))
                    {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        body[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Case-insensitive stop-word set.
#[derive(Debug, Clone)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self(words.into_iter().map(str::to_lowercase).collect())
    }

    pub fn with_extra<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.0.extend(words.into_iter().map(str::to_lowercase));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOP_WORDS.iter().copied())
    }
}

/// Turns titles into phrase and unigram terms.
#[derive(Debug, Clone)]
pub struct TermExtractor {
    stop_words: StopWords,
    min_token_len: usize,
    min_unigram_len: usize,
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new(StopWords::default())
    }
}

impl TermExtractor {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            min_token_len: 3,
            min_unigram_len: 5,
        }
    }

    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    pub fn with_min_unigram_len(mut self, len: usize) -> Self {
        self.min_unigram_len = len;
        self
    }

    /// Normalized tokens that survive the length, digit and stop-word filters.
    pub fn tokens(&self, title: &str) -> Vec<String> {
        let normalized: String = decode_entities(title)
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        normalized
            .split_whitespace()
            .filter(|t| t.len() >= self.min_token_len)
            .filter(|t| !t.bytes().all(|b| b.is_ascii_digit()))
            .filter(|t| !self.stop_words.contains(t))
            .map(str::to_string)
            .collect()
    }

    /// All terms of a title: adjacent-pair phrases first, then long unigrams.
    ///
    /// Duplicates are kept; the aggregator removes them per item.
    pub fn extract(&self, title: &str) -> Vec<String> {
        let tokens = self.tokens(title);
        let phrases = tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1]));
        let unigrams = tokens
            .iter()
            .filter(|t| t.len() >= self.min_unigram_len)
            .cloned();
        phrases.chain(unigrams).collect()
    }
}
