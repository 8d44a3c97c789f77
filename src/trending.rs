//! Trending-topic resolution with a single fallback.
//!
//! Items are acquired from the first path in [`ACQUISITION_ORDER`] that
//! answers, then clustered by [`TopicAggregator`]. Callers only see the
//! resulting topics, never which path produced them.

use crate::error::NewsError;
use crate::feed::{FeedQuery, FeedSource};
use crate::models::{Item, LatestItems, Source, TrendingTopics};
use crate::topics::TopicAggregator;
use chrono::Utc;
use std::fmt;
use tracing::{error, info, instrument, warn};

/// Caller-supplied parameters of a trending request.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingParams {
    pub hours: u32,
    pub limit: usize,
    pub region: Option<String>,
    pub category: Option<String>,
}

impl TrendingParams {
    pub fn new(hours: u32, limit: usize) -> Self {
        Self {
            hours,
            limit,
            region: None,
            category: None,
        }
    }

    /// Raw items to request so clusters can reach the mention threshold.
    pub fn retrieval_size(&self) -> usize {
        self.limit.saturating_mul(10).clamp(50, 300)
    }

    fn feed_query(&self) -> FeedQuery {
        FeedQuery::new(self.hours, self.retrieval_size())
            .with_region(self.region.clone())
            .with_category(self.category.clone())
    }
}

/// One way of obtaining the raw items for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// The feed's pre-aggregated trending view.
    Trending,
    /// The generic score-ranked listing, bounded to the same window.
    RankedListing,
}

/// Paths tried in order until one returns items.
pub const ACQUISITION_ORDER: [Acquisition; 2] = [Acquisition::Trending, Acquisition::RankedListing];

impl Acquisition {
    pub async fn fetch<F: FeedSource>(
        self,
        feed: &F,
        query: &FeedQuery,
    ) -> Result<Vec<Item>, NewsError> {
        match self {
            Acquisition::Trending => feed.trending(query).await,
            Acquisition::RankedListing => feed.items(&query.windowed(Utc::now())).await,
        }
    }
}

impl fmt::Display for Acquisition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acquisition::Trending => write!(f, "trending"),
            Acquisition::RankedListing => write!(f, "ranked listing"),
        }
    }
}

/// Fetch items via the first working path and derive the top topics.
///
/// The trending view is asked first. Any upstream failure there (transport,
/// status or decode) moves on to the ranked listing over the same window,
/// and the listing's items are clustered locally.
///
/// # Arguments
///
/// * `feed` - Upstream news feed
/// * `aggregator` - Term extraction and ranking configuration
/// * `params` - Window, topic limit and optional region/category filters
///
/// # Returns
///
/// At most `params.limit` ranked topics. An empty item set is a valid answer
/// and yields zero topics. When every path fails the error is
/// [`NewsError::AllSourcesFailed`], carrying each path's failure in order.
#[instrument(level = "info", skip_all, fields(hours = params.hours, limit = params.limit))]
pub async fn resolve_trending_topics<F: FeedSource>(
    feed: &F,
    aggregator: &TopicAggregator,
    params: &TrendingParams,
) -> Result<TrendingTopics, NewsError> {
    let query = params.feed_query();
    let mut failures = Vec::new();

    for path in ACQUISITION_ORDER {
        match path.fetch(feed, &query).await {
            Ok(items) => {
                info!(%path, items = items.len(), "Acquired items");
                let topics = aggregator.derive_topics(&items, params.limit);
                return Ok(TrendingTopics::new(params.hours, topics));
            }
            Err(e) => {
                warn!(%path, error = %e, "Item acquisition failed");
                failures.push(e);
            }
        }
    }

    error!(attempts = failures.len(), "Every item acquisition path failed");
    Err(NewsError::AllSourcesFailed(failures))
}

/// Ranked items of the last `hours`, without any fallback.
#[instrument(level = "info", skip_all, fields(hours = query.hours, limit = query.limit))]
pub async fn latest_items<F: FeedSource>(
    feed: &F,
    query: &FeedQuery,
) -> Result<LatestItems, NewsError> {
    let items = feed.items(&query.windowed(Utc::now())).await?;
    info!(count = items.len(), "Fetched ranked items");
    Ok(LatestItems {
        hours: query.hours,
        count: items.len(),
        items,
    })
}

/// Source catalog, optionally restricted to one region (case-insensitive).
#[instrument(level = "info", skip_all, fields(region = ?region))]
pub async fn list_sources<F: FeedSource>(
    feed: &F,
    region: Option<&str>,
) -> Result<Vec<Source>, NewsError> {
    let sources = feed.sources().await?;
    let total = sources.len();
    let kept: Vec<Source> = match region {
        Some(wanted) => sources
            .into_iter()
            .filter(|s| {
                s.region
                    .as_deref()
                    .is_some_and(|r| r.eq_ignore_ascii_case(wanted))
            })
            .collect(),
        None => sources,
    };
    info!(total, kept = kept.len(), "Listed sources");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::cell::RefCell;

    #[derive(Default)]
    struct StubFeed {
        trending: Option<Vec<Item>>,
        listing: Option<Vec<Item>>,
        /// Returned once by `trending` ahead of the canned answer.
        trending_failure: RefCell<Option<NewsError>>,
        sources: Vec<Source>,
        calls: RefCell<Vec<(&'static str, FeedQuery)>>,
    }

    fn unavailable(endpoint: &str) -> NewsError {
        NewsError::Status {
            endpoint: endpoint.to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    impl FeedSource for StubFeed {
        async fn trending(&self, query: &FeedQuery) -> Result<Vec<Item>, NewsError> {
            self.calls.borrow_mut().push(("trending", query.clone()));
            if let Some(e) = self.trending_failure.borrow_mut().take() {
                return Err(e);
            }
            self.trending.clone().ok_or_else(|| unavailable("trending"))
        }

        async fn items(&self, query: &FeedQuery) -> Result<Vec<Item>, NewsError> {
            self.calls.borrow_mut().push(("items", query.clone()));
            self.listing.clone().ok_or_else(|| unavailable("items"))
        }

        async fn sources(&self) -> Result<Vec<Source>, NewsError> {
            Ok(self.sources.clone())
        }
    }

    fn robot_items() -> Vec<Item> {
        [
            ("Robot Learns Dance", 5.0),
            ("Robot Dance Goes Viral", 9.0),
            ("New Robot Dance Craze", 2.0),
        ]
        .into_iter()
        .map(|(title, score)| Item {
            title: title.to_string(),
            url: "https://example.com".to_string(),
            score,
            ..Default::default()
        })
        .collect()
    }

    #[test]
    fn test_retrieval_size_bounds() {
        assert_eq!(TrendingParams::new(24, 1).retrieval_size(), 50);
        assert_eq!(TrendingParams::new(24, 5).retrieval_size(), 50);
        assert_eq!(TrendingParams::new(24, 10).retrieval_size(), 100);
        assert_eq!(TrendingParams::new(24, 30).retrieval_size(), 300);
        assert_eq!(TrendingParams::new(24, 1000).retrieval_size(), 300);
        assert_eq!(TrendingParams::new(24, usize::MAX).retrieval_size(), 300);
    }

    #[tokio::test]
    async fn test_primary_path_used_when_available() {
        let feed = StubFeed {
            trending: Some(robot_items()),
            listing: Some(vec![]),
            ..Default::default()
        };
        let aggregator = TopicAggregator::default();
        let out = resolve_trending_topics(&feed, &aggregator, &TrendingParams::new(24, 10))
            .await
            .unwrap();

        assert_eq!(out.hours, 24);
        assert_eq!(out.count, 3);
        assert_eq!(out.topics[0].topic, "robot dance");

        let calls = feed.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "trending");
        assert_eq!(calls[0].1.limit, 100);
        assert!(calls[0].1.since.is_none());
    }

    #[tokio::test]
    async fn test_falls_back_to_listing_when_trending_fails() {
        let feed = StubFeed {
            trending: None,
            listing: Some(robot_items()),
            ..Default::default()
        };
        let mut params = TrendingParams::new(12, 2);
        params.region = Some("us".to_string());

        let out = resolve_trending_topics(&feed, &TopicAggregator::default(), &params)
            .await
            .unwrap();

        assert_eq!(out.count, 2);
        assert_eq!(out.topics.len(), 2);
        assert_eq!(out.topics[0].topic, "robot dance");
        assert_eq!(out.topics[0].mention_count, 3);

        let calls = feed.calls.borrow();
        let names: Vec<&str> = calls.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["trending", "items"]);
        let listing_query = &calls[1].1;
        assert_eq!(listing_query.limit, 50);
        assert_eq!(listing_query.hours, 12);
        assert_eq!(listing_query.region.as_deref(), Some("us"));
        assert!(listing_query.since.is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_listing() {
        // nothing listens on port 1, so the connection is refused
        let source = reqwest::Client::new()
            .get("http://127.0.0.1:1/")
            .send()
            .await
            .unwrap_err();
        let feed = StubFeed {
            trending_failure: RefCell::new(Some(NewsError::Transport {
                endpoint: "trending".to_string(),
                source,
            })),
            listing: Some(robot_items()),
            ..Default::default()
        };
        let aggregator = TopicAggregator::default();
        let out = resolve_trending_topics(&feed, &aggregator, &TrendingParams::new(24, 10))
            .await
            .unwrap();

        assert_eq!(out.topics, aggregator.derive_topics(&robot_items(), 10));
        assert_eq!(out.count, 3);
        let names: Vec<&str> = feed.calls.borrow().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["trending", "items"]);
    }

    #[tokio::test]
    async fn test_both_paths_failing_is_single_error() {
        let feed = StubFeed::default();
        let aggregator = TopicAggregator::default();
        let err = resolve_trending_topics(&feed, &aggregator, &TrendingParams::new(24, 10))
            .await
            .unwrap_err();

        match err {
            NewsError::AllSourcesFailed(failures) => {
                assert_eq!(failures.len(), 2);
                assert!(failures.iter().all(NewsError::is_upstream));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_upstream_is_not_an_error() {
        let feed = StubFeed {
            trending: Some(vec![]),
            ..Default::default()
        };
        let aggregator = TopicAggregator::default();
        let out = resolve_trending_topics(&feed, &aggregator, &TrendingParams::new(6, 10))
            .await
            .unwrap();
        assert_eq!(out.hours, 6);
        assert_eq!(out.count, 0);
        assert!(out.topics.is_empty());
    }

    #[tokio::test]
    async fn test_each_acquisition_path_in_isolation() {
        let feed = StubFeed {
            trending: None,
            listing: Some(robot_items()),
            ..Default::default()
        };
        let query = FeedQuery::new(24, 50);

        assert!(Acquisition::Trending.fetch(&feed, &query).await.is_err());
        let items = Acquisition::RankedListing.fetch(&feed, &query).await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(ACQUISITION_ORDER[0], Acquisition::Trending);
    }

    #[tokio::test]
    async fn test_latest_items_surfaces_failure() {
        let feed = StubFeed::default();
        let err = latest_items(&feed, &FeedQuery::new(24, 50)).await.unwrap_err();
        assert!(err.is_upstream());

        let feed = StubFeed {
            listing: Some(robot_items()),
            ..Default::default()
        };
        let out = latest_items(&feed, &FeedQuery::new(24, 50)).await.unwrap();
        assert_eq!(out.count, 3);
    }

    #[tokio::test]
    async fn test_list_sources_region_filter() {
        let sources: Vec<Source> = serde_json::from_str(
            r#"[
                {"id": "bbc", "region": "UK"},
                {"id": "npr", "region": "us"},
                {"id": "wire"}
            ]"#,
        )
        .unwrap();
        let feed = StubFeed {
            sources,
            ..Default::default()
        };

        let uk = list_sources(&feed, Some("uk")).await.unwrap();
        assert_eq!(uk.len(), 1);
        assert_eq!(uk[0].extra["id"], "bbc");

        let all = list_sources(&feed, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
