//! Upstream feed and page access.
//!
//! The rest of the crate talks to the network only through two traits:
//! - [`FeedSource`]: the news feed (`trending`, ranked `items`, `sources`)
//! - [`PageSource`]: raw HTML of an arbitrary article URL
//!
//! [`HttpFeed`] implements both over a single `reqwest` client. Tests swap in
//! stubs to force individual paths to fail.
//!
//! # Endpoints
//!
//! | Query | Request | Body |
//! |-------|---------|------|
//! | trending | `GET {base}/trending?hours=&limit=&region=&category=` | `{items: [...]}` |
//! | items | `GET {base}/items?hours=&since=&limit=&sort=score&region=&category=` | `{items: [...]}` |
//! | sources | `GET {base}/sources` | `{sources: [...]}` |

use crate::config::FeedSettings;
use crate::error::NewsError;
use crate::models::{Item, ItemsResponse, Source, SourcesResponse};
use crate::utils::truncate_for_log;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration as StdDuration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Parameters shared by the `trending` and `items` queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    pub hours: u32,
    pub limit: usize,
    pub region: Option<String>,
    pub category: Option<String>,
    /// Lower bound on `published_at`; only sent with the `items` query.
    pub since: Option<DateTime<Utc>>,
}

impl FeedQuery {
    pub fn new(hours: u32, limit: usize) -> Self {
        Self {
            hours,
            limit,
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Copy of this query bounded to items published in the last `hours`.
    pub fn windowed(&self, now: DateTime<Utc>) -> Self {
        Self {
            since: Some(now - Duration::hours(i64::from(self.hours))),
            ..self.clone()
        }
    }
}

/// The upstream news feed.
pub trait FeedSource {
    /// Items behind the pre-aggregated trending view.
    async fn trending(&self, query: &FeedQuery) -> Result<Vec<Item>, NewsError>;

    /// Generic listing ranked by score.
    async fn items(&self, query: &FeedQuery) -> Result<Vec<Item>, NewsError>;

    /// The source catalog.
    async fn sources(&self) -> Result<Vec<Source>, NewsError>;
}

/// Raw HTML retrieval for article extraction.
pub trait PageSource {
    async fn fetch_page(&self, url: &str) -> Result<String, NewsError>;
}

/// HTTP implementation of [`FeedSource`] and [`PageSource`].
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: Client,
    base: Url,
}

impl HttpFeed {
    /// Build a feed client from the `feed` section of the settings.
    ///
    /// A missing trailing slash on the base URL is added so relative
    /// endpoint paths resolve beneath it rather than replacing its last segment.
    ///
    /// # Arguments
    ///
    /// * `settings` - Base URL, user agent and optional request timeout
    ///
    /// # Returns
    ///
    /// The client, or [`NewsError::InvalidUrl`] when the base URL does not
    /// parse and [`NewsError::Transport`] when the HTTP client cannot be built.
    pub fn new(settings: &FeedSettings) -> Result<Self, NewsError> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(StdDuration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| NewsError::Transport {
            endpoint: settings.base_url.clone(),
            source: e,
        })?;
        Ok(Self {
            client,
            base: base_url(&settings.base_url)?,
        })
    }

    /// Build the URL for one feed query.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, NewsError> {
        let mut url = self.base.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    #[instrument(level = "info", skip_all, fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, NewsError> {
        let t0 = Instant::now();
        let endpoint = url.to_string();

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NewsError::Transport {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                %status,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                body_preview = %truncate_for_log(&body, 200),
                "Feed returned non-success status"
            );
            return Err(NewsError::Status { endpoint, status });
        }

        let body = resp
            .json::<T>()
            .await
            .map_err(|e| NewsError::Decode { endpoint, source: e })?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Feed request completed");
        Ok(body)
    }
}

fn base_url(raw: &str) -> Result<Url, NewsError> {
    // Url::join drops the last path segment unless it ends with a slash.
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

fn filter_params(query: &FeedQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("hours", query.hours.to_string()),
        ("limit", query.limit.to_string()),
    ];
    if let Some(region) = &query.region {
        params.push(("region", region.clone()));
    }
    if let Some(category) = &query.category {
        params.push(("category", category.clone()));
    }
    params
}

/// Query string of the `trending` endpoint.
pub fn trending_params(query: &FeedQuery) -> Vec<(&'static str, String)> {
    filter_params(query)
}

/// Query string of the ranked `items` endpoint.
pub fn listing_params(query: &FeedQuery) -> Vec<(&'static str, String)> {
    let mut params = filter_params(query);
    if let Some(since) = query.since {
        params.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }
    params.push(("sort", "score".to_string()));
    params
}

impl FeedSource for HttpFeed {
    async fn trending(&self, query: &FeedQuery) -> Result<Vec<Item>, NewsError> {
        let url = self.endpoint("trending", &trending_params(query))?;
        let body: ItemsResponse = self.get_json(url).await?;
        Ok(body.items)
    }

    async fn items(&self, query: &FeedQuery) -> Result<Vec<Item>, NewsError> {
        let url = self.endpoint("items", &listing_params(query))?;
        let body: ItemsResponse = self.get_json(url).await?;
        Ok(body.items)
    }

    async fn sources(&self) -> Result<Vec<Source>, NewsError> {
        let url = self.endpoint("sources", &[])?;
        let body: SourcesResponse = self.get_json(url).await?;
        Ok(body.sources)
    }
}

impl PageSource for HttpFeed {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_page(&self, url: &str) -> Result<String, NewsError> {
        let page_fetch = |reason: String| NewsError::PageFetch {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url)?;
        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| page_fetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(page_fetch(format!("status {status}")));
        }

        let html = resp.text().await.map_err(|e| page_fetch(e.to_string()))?;
        debug!(bytes = html.len(), "Fetched page");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn feed(base: &str) -> HttpFeed {
        let settings = FeedSettings {
            base_url: base.to_string(),
            ..Default::default()
        };
        HttpFeed::new(&settings).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let with_slash = feed("https://feed.example.com/api/v1/");
        let without_slash = feed("https://feed.example.com/api/v1");
        for f in [with_slash, without_slash] {
            let url = f.endpoint("trending", &[]).unwrap();
            assert_eq!(url.as_str(), "https://feed.example.com/api/v1/trending");
        }
    }

    #[test]
    fn test_trending_query_string() {
        let query = FeedQuery::new(24, 100)
            .with_region(Some("us".to_string()))
            .with_category(Some("tech & science".to_string()));
        let url = feed("https://feed.example.com/")
            .endpoint("trending", &trending_params(&query))
            .unwrap();
        assert_eq!(
            url.query(),
            Some("hours=24&limit=100&region=us&category=tech+%26+science")
        );
    }

    #[test]
    fn test_listing_query_string_has_window_and_sort() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 12, 0, 0).unwrap();
        let query = FeedQuery::new(6, 50).windowed(now);
        assert_eq!(
            query.since,
            Some(Utc.with_ymd_and_hms(2025, 5, 6, 6, 0, 0).unwrap())
        );

        let params = listing_params(&query);
        assert!(params.contains(&("since", "2025-05-06T06:00:00Z".to_string())));
        assert!(params.contains(&("sort", "score".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "region"));
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = FeedSettings {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpFeed::new(&settings),
            Err(NewsError::InvalidUrl(_))
        ));
    }
}
