//! Error types shared by the feed client, trending resolver and CLI.
//!
//! Failures fall into three groups:
//!
//! - **Upstream unavailable** ([`NewsError::Transport`], [`NewsError::Status`],
//!   [`NewsError::Decode`]): a single feed query failed. The trending resolver
//!   absorbs one of these by falling back to the ranked listing.
//! - **Total failure** ([`NewsError::AllSourcesFailed`], [`NewsError::PageFetch`]):
//!   nothing usable could be acquired; reported to the caller as-is.
//! - Local problems: bad URLs, config files, output I/O.
//!
//! Degraded document extraction is not represented here at all. A failing
//! reader pass only produces emptier fields.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} responded with status {status}")]
    Status { endpoint: String, status: StatusCode },

    #[error("unexpected response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("all trending sources failed: {}", summarize(.0))]
    AllSourcesFailed(Vec<NewsError>),

    #[error("failed to fetch page {url}: {reason}")]
    PageFetch { url: String, reason: String },

    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NewsError {
    /// True for the errors a single feed query can produce.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            NewsError::Transport { .. } | NewsError::Status { .. } | NewsError::Decode { .. }
        )
    }
}

fn summarize(failures: &[NewsError]) -> String {
    if failures.is_empty() {
        return "no sources attempted".to_string();
    }
    failures
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
