//! Structured (Readability-style) reader pass.
//!
//! The reader is the first stage of every field's fallback chain. It is
//! expected to fail on plenty of real pages; callers treat an `Err` the same
//! as an empty [`ReaderView`].

use dom_smoothie::Readability;
use std::error::Error;
use tracing::{debug, instrument};

/// What a reader pass managed to recover. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderView {
    pub title: Option<String>,
    pub site_name: Option<String>,
    pub text: Option<String>,
}

pub trait StructuredReader {
    fn read(&self, html: &str, url: &str) -> Result<ReaderView, Box<dyn Error>>;
}

/// Reader backed by `dom_smoothie`, a port of Mozilla's Readability.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothieReader;

impl StructuredReader for SmoothieReader {
    #[instrument(level = "debug", skip_all, fields(%url))]
    fn read(&self, html: &str, url: &str) -> Result<ReaderView, Box<dyn Error>> {
        let mut readability = Readability::new(html, Some(url), None)?;
        let article = readability.parse()?;

        let view = ReaderView {
            title: Some(article.title.to_string()),
            site_name: article.site_name.clone(),
            text: Some(article.text_content.to_string()),
        };
        debug!(
            has_title = view.title.is_some(),
            has_site_name = view.site_name.is_some(),
            text_len = view.text.as_ref().map_or(0, String::len),
            "Reader pass finished"
        );
        Ok(view)
    }
}
