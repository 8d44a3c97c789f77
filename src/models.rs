//! Data models for feed items, derived topics and extracted documents.
//!
//! This module defines the structures exchanged with the upstream feed and
//! returned to callers:
//! - [`Item`]: one news item as delivered by the feed
//! - [`Topic`] / [`ArticleSummary`]: a ranked cluster of items sharing a term
//! - [`TrendingTopics`]: the `{hours, count, topics}` envelope
//! - [`ExtractedDocument`]: readable text and metadata pulled from one page
//! - [`Source`]: one entry of the upstream source catalog
//!
//! Everything here is built fresh per call. Nothing is persisted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A news item as delivered by the upstream feed.
///
/// The feed is loose about a few fields: `score` may be missing or `null`
/// (both read as `0`), the outlet may arrive as `source` or `source_id`, and
/// `id` may be a string or a number.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, deserialize_with = "score_or_zero")]
    pub score: f64,
}

impl Item {
    /// The outlet name, preferring `source` over `source_id`.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref().or(self.source_id.as_deref())
    }

    /// Read-only projection used inside [`Topic::top_articles`].
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            title: self.title.clone(),
            url: self.url.clone(),
            source: self.source_name().map(str::to_string),
            published_at: self.published_at.clone(),
            score: self.score,
        }
    }
}

fn score_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Response body of both the `trending` and `items` feed queries.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// One entry of the upstream source catalog.
///
/// Only `region` is interpreted; every other field is carried through untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Source {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SourcesResponse {
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// Compact view of an item shown under a topic.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub score: f64,
}

/// A cluster of items that share one term.
///
/// `mention_count` is the number of distinct items whose title yields the
/// term. `top_articles` holds at most five of those items, best score first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Topic {
    pub topic: String,
    pub mention_count: usize,
    pub top_articles: Vec<ArticleSummary>,
}

impl Topic {
    /// Score of the best article, used as the secondary ranking key.
    pub fn peak_score(&self) -> f64 {
        self.top_articles.first().map_or(0.0, |a| a.score)
    }
}

/// Result of a trending-topics request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrendingTopics {
    pub hours: u32,
    pub count: usize,
    pub topics: Vec<Topic>,
}

impl TrendingTopics {
    pub fn new(hours: u32, topics: Vec<Topic>) -> Self {
        Self {
            hours,
            count: topics.len(),
            topics,
        }
    }
}

/// Result of the ranked-listing request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatestItems {
    pub hours: u32,
    pub count: usize,
    pub items: Vec<Item>,
}

/// Readable content and metadata extracted from a single HTML page.
///
/// `published_at` is `None` when no date could be found, never an empty string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExtractedDocument {
    pub title: String,
    pub content: String,
    pub source: String,
    pub published_at: Option<String>,
    pub word_count: usize,
}

impl ExtractedDocument {
    /// Build a document, deriving `word_count` from `content`.
    pub fn new(
        title: String,
        content: String,
        source: String,
        published_at: Option<String>,
    ) -> Self {
        let word_count = content.split_whitespace().count();
        Self {
            title,
            content,
            source,
            published_at,
            word_count,
        }
    }
}
