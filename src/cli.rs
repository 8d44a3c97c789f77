//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! Global options can also be supplied through environment variables.

use crate::outputs::Format;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Derive trending topics from a news feed and extract readable article text.
///
/// # Examples
///
/// ```sh
/// # Top ten topics of the last day
/// news_topics trending
///
/// # Six-hour window, UK sources only, written as Markdown
/// news_topics --format markdown trending --hours 6 --region uk
///
/// # Readable text of two articles
/// news_topics --pretty extract https://example.com/a https://example.com/b
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_TOPICS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the news feed API (overrides the config file)
    #[arg(long, env = "NEWS_FEED_URL", global = true)]
    pub feed_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json, global = true)]
    pub format: Format,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Write the result to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank the topics trending within a recent window
    Trending(WindowArgs),

    /// List the highest-scored items within a recent window
    Latest {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// List the feed's source catalog
    Sources {
        /// Only keep sources from this region
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Extract title, text and metadata from article URLs
    Extract {
        /// Article URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Maximum number of pages fetched at once
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
}

/// Time window and filters shared by `trending` and `latest`.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Window size in hours
    #[arg(long, default_value_t = 24)]
    pub hours: u32,

    /// Number of results to return (defaults: 10 topics, 50 items)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Restrict to sources from this region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Restrict to one category
    #[arg(long)]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_defaults() {
        let cli = Cli::parse_from(["news_topics", "trending"]);
        assert_eq!(cli.format, Format::Json);
        assert!(!cli.pretty);
        match cli.command {
            Command::Trending(window) => {
                assert_eq!(window.hours, 24);
                assert_eq!(window.limit, None);
                assert_eq!(window.region, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_trending_with_filters_and_global_flags() {
        let cli = Cli::parse_from([
            "news_topics",
            "trending",
            "--hours",
            "6",
            "-l",
            "5",
            "--region",
            "uk",
            "--category",
            "science",
            "--format",
            "markdown",
            "-o",
            "/tmp/topics.md",
        ]);
        assert_eq!(cli.format, Format::Markdown);
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/topics.md")));
        match cli.command {
            Command::Trending(window) => {
                assert_eq!(window.hours, 6);
                assert_eq!(window.limit, Some(5));
                assert_eq!(window.region.as_deref(), Some("uk"));
                assert_eq!(window.category.as_deref(), Some("science"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_extract_requires_urls() {
        assert!(Cli::try_parse_from(["news_topics", "extract"]).is_err());

        let cli = Cli::parse_from([
            "news_topics",
            "--pretty",
            "extract",
            "https://a.example/1",
            "https://b.example/2",
        ]);
        assert!(cli.pretty);
        match cli.command {
            Command::Extract { urls, concurrency } => {
                assert_eq!(urls.len(), 2);
                assert_eq!(concurrency, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_negative_limit_rejected() {
        assert!(Cli::try_parse_from(["news_topics", "trending", "--limit", "-1"]).is_err());
    }

    #[test]
    fn test_sources_region() {
        let cli = Cli::parse_from(["news_topics", "sources", "-r", "us"]);
        match cli.command {
            Command::Sources { region } => assert_eq!(region.as_deref(), Some("us")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
