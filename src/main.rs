//! # News Topics
//!
//! Derives "trending topics" from a news item feed and extracts clean,
//! readable text from article pages.
//!
//! ## Features
//!
//! - Clusters recent items by shared title phrase or keyword and ranks the
//!   clusters by how many distinct items mention them
//! - Falls back from the feed's trending view to its ranked item listing
//!   when the former is unavailable
//! - Pulls title, body text, source and publish date out of arbitrary HTML
//!   through a reader pass with metadata fallbacks
//! - Outputs JSON (for other programs) or Markdown (for people)
//!
//! ## Usage
//!
//! ```sh
//! news_topics --feed-url https://feed.example.com/api trending --hours 12
//! news_topics extract https://example.com/story
//! ```
//!
//! ## Architecture
//!
//! 1. **Acquisition**: fetch raw items (trending view, else ranked listing)
//! 2. **Term extraction**: split titles into phrases and keywords
//! 3. **Aggregation**: group items per term, threshold and rank
//! 4. **Output**: render JSON or Markdown to stdout or a file

use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod feed;
mod models;
mod outputs;
mod topics;
mod trending;
mod utils;

use cli::{Cli, Command, WindowArgs};
use config::Settings;
use error::NewsError;
use extract::reader::SmoothieReader;
use feed::{FeedQuery, HttpFeed};
use models::ExtractedDocument;
use outputs::{Format, json, markdown};
use trending::TrendingParams;

const DEFAULT_LATEST_LIMIT: usize = 50;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.command, ?args.config, "Parsed CLI arguments");

    if let Err(e) = run(args).await {
        error!(error = %e, upstream = e.is_upstream(), "news_topics failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    Ok(())
}

async fn run(args: Cli) -> Result<(), NewsError> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = &args.feed_url {
        settings.feed.base_url = url.clone();
    }
    let feed = HttpFeed::new(&settings.feed)?;

    let rendered = match &args.command {
        Command::Trending(window) => {
            let aggregator = settings.topics.aggregator();
            let params = trending_params(window, settings.topics.default_top_n);
            let result = trending::resolve_trending_topics(&feed, &aggregator, &params).await?;
            info!(count = result.count, hours = result.hours, "Resolved trending topics");
            match args.format {
                Format::Json => json::render(&result, args.pretty)?,
                Format::Markdown => markdown::trending_to_markdown(&result),
            }
        }
        Command::Latest { window } => {
            let limit = window.limit.unwrap_or(DEFAULT_LATEST_LIMIT);
            let query = FeedQuery::new(window.hours, limit)
                .with_region(window.region.clone())
                .with_category(window.category.clone());
            let result = trending::latest_items(&feed, &query).await?;
            match args.format {
                Format::Json => json::render(&result, args.pretty)?,
                Format::Markdown => markdown::latest_to_markdown(&result),
            }
        }
        Command::Sources { region } => {
            let sources = trending::list_sources(&feed, region.as_deref()).await?;
            match args.format {
                Format::Json => {
                    json::render(&serde_json::json!({ "sources": sources }), args.pretty)?
                }
                Format::Markdown => markdown::sources_to_markdown(&sources),
            }
        }
        Command::Extract { urls, concurrency } => {
            let docs = extract_all(&feed, urls, *concurrency).await?;
            render_documents(&docs, args.format, args.pretty)?
        }
    };

    outputs::emit(&rendered, args.output.as_deref()).await
}

fn trending_params(window: &WindowArgs, default_top_n: usize) -> TrendingParams {
    TrendingParams {
        hours: window.hours,
        limit: window.limit.unwrap_or(default_top_n),
        region: window.region.clone(),
        category: window.category.clone(),
    }
}

/// Fetch and extract every URL, at most `concurrency` at a time.
///
/// Input order is preserved. A single URL failing fails the whole command,
/// since each extraction is all-or-nothing.
#[instrument(level = "info", skip_all, fields(urls = urls.len(), concurrency = concurrency))]
async fn extract_all(
    feed: &HttpFeed,
    urls: &[String],
    concurrency: usize,
) -> Result<Vec<ExtractedDocument>, NewsError> {
    let reader = SmoothieReader;
    let results: Vec<Result<ExtractedDocument, NewsError>> = stream::iter(urls)
        .map(|url| extract::extract_url(feed, &reader, url))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let docs = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(count = docs.len(), "Extracted all documents");
    Ok(docs)
}

fn render_documents(
    docs: &[ExtractedDocument],
    format: Format,
    pretty: bool,
) -> Result<String, NewsError> {
    match (format, docs) {
        (Format::Json, [single]) => json::render(single, pretty),
        (Format::Json, many) => json::render(many, pretty),
        (Format::Markdown, many) => Ok(many
            .iter()
            .map(markdown::document_to_markdown)
            .collect::<Vec<_>>()
            .join("\n---\n\n")),
    }
}
