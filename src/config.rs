//! Runtime settings loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file, a partial file, or no file at
//! all produce a working configuration.
//!
//! ```yaml
//! feed:
//!   base_url: https://feed.example.com/api/
//!   timeout_secs: 20
//! topics:
//!   min_mentions: 3
//!   extra_stop_words: [exclusive, opinion]
//! ```

use crate::error::NewsError;
use crate::topics::{StopWords, TermExtractor, TopicAggregator};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feed: FeedSettings,
    pub topics: TopicSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout of the HTTP adapter. `None` leaves reqwest's default.
    pub timeout_secs: Option<u64>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/".to_string(),
            user_agent: concat!("news_topics/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

/// Tuning knobs for term extraction and topic ranking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopicSettings {
    pub min_mentions: usize,
    pub max_top_articles: usize,
    pub min_token_len: usize,
    pub min_unigram_len: usize,
    pub default_top_n: usize,
    /// Replaces the built-in stop-word list when set.
    pub stop_words: Option<Vec<String>>,
    /// Appended to whichever stop-word list is in effect.
    pub extra_stop_words: Vec<String>,
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            min_mentions: 3,
            max_top_articles: 5,
            min_token_len: 3,
            min_unigram_len: 5,
            default_top_n: 10,
            stop_words: None,
            extra_stop_words: Vec::new(),
        }
    }
}

impl TopicSettings {
    pub fn stop_words(&self) -> StopWords {
        let base = match &self.stop_words {
            Some(words) => StopWords::from_words(words.iter().map(String::as_str)),
            None => StopWords::default(),
        };
        base.with_extra(self.extra_stop_words.iter().map(String::as_str))
    }

    pub fn aggregator(&self) -> TopicAggregator {
        let stop_words = self.stop_words();
        if stop_words.is_empty() {
            warn!("Stop-word list is empty; function words will become topics");
        }
        debug!(
            stop_words = stop_words.len(),
            min_mentions = self.min_mentions,
            "Building topic aggregator"
        );
        let extractor = TermExtractor::new(stop_words)
            .with_min_token_len(self.min_token_len)
            .with_min_unigram_len(self.min_unigram_len);
        TopicAggregator::new(extractor)
            .with_min_mentions(self.min_mentions)
            .with_max_top_articles(self.max_top_articles)
    }
}

impl Settings {
    pub fn from_yaml(text: &str) -> Result<Self, NewsError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load settings from `path`, or return defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, NewsError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml(&text)?;
        info!(path = %path.display(), base_url = %settings.feed.base_url, "Loaded configuration");
        Ok(settings)
    }
}
