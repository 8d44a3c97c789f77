//! Readable text and metadata extraction from article pages.
//!
//! Each output field is resolved by its own ordered chain of strategies,
//! stopping at the first one that yields a non-empty value:
//!
//! | Field | Chain |
//! |-------|-------|
//! | title | reader → `og:title` → `twitter:title` → `<title>` → `""` |
//! | source | reader site name → `og:site_name` → URL host without `www.` → `""` |
//! | published_at | `article:published_time` → `pubdate` → `date` → first `<time datetime>` → `null` |
//! | content | reader text → `<article>` → `<main>` → `<body>` → `""` |
//!
//! A failing reader pass never fails the extraction; every chain simply
//! starts at its second step.

pub mod page;
pub mod reader;

use crate::error::NewsError;
use crate::feed::PageSource;
use crate::models::ExtractedDocument;
use crate::utils::{host_without_www, non_empty};
use page::Page;
use reader::{ReaderView, StructuredReader};
use tracing::{debug, info, instrument};

/// One fallible strategy in a field's chain.
type Step<'a> = &'a dyn Fn() -> Option<String>;

/// First value produced by `chain`, in order.
fn first_success(chain: &[Step<'_>]) -> Option<String> {
    chain.iter().find_map(|step| step())
}

/// Run the extraction cascade over an already fetched page.
///
/// Never fails: a reader error only means every field starts from its
/// metadata fallback, and fields with no match end up empty (or `None` for
/// the publish date).
///
/// # Arguments
///
/// * `reader` - Structured reader tried first for title, site name and text
/// * `html` - Raw page markup
/// * `url` - Address the page was fetched from, used for the host fallback
///
/// # Returns
///
/// The [`ExtractedDocument`], with `word_count` computed from `content`.
#[instrument(level = "info", skip_all, fields(%url, bytes = html.len()))]
pub fn extract_document<R: StructuredReader>(
    reader: &R,
    html: &str,
    url: &str,
) -> ExtractedDocument {
    let view = match reader.read(html, url) {
        Ok(view) => view,
        Err(e) => {
            debug!(error = %e, "Reader pass failed; continuing with page metadata");
            ReaderView::default()
        }
    };
    let page = Page::parse(html);

    let title_chain: [Step; 4] = [
        &|| view.title.as_deref().and_then(non_empty),
        &|| page.meta("og:title"),
        &|| page.meta("twitter:title"),
        &|| page.title(),
    ];
    let source_chain: [Step; 3] = [
        &|| view.site_name.as_deref().and_then(non_empty),
        &|| page.meta("og:site_name"),
        &|| host_without_www(url),
    ];
    let published_chain: [Step; 4] = [
        &|| page.meta("article:published_time"),
        &|| page.meta("pubdate"),
        &|| page.meta("date"),
        &|| page.time_datetime(),
    ];
    let content_chain: [Step; 4] = [
        &|| view.text.as_deref().and_then(non_empty),
        &|| page.block_text("article"),
        &|| page.block_text("main"),
        &|| page.block_text("body"),
    ];

    let doc = ExtractedDocument::new(
        first_success(&title_chain).unwrap_or_default(),
        first_success(&content_chain).unwrap_or_default(),
        first_success(&source_chain).unwrap_or_default(),
        first_success(&published_chain),
    );
    debug!(
        title = %doc.title,
        source = %doc.source,
        words = doc.word_count,
        "Extracted document"
    );
    doc
}

/// Fetch `url` and extract it. Only the fetch can fail.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn extract_url<P, R>(
    pages: &P,
    reader: &R,
    url: &str,
) -> Result<ExtractedDocument, NewsError>
where
    P: PageSource,
    R: StructuredReader,
{
    let html = pages.fetch_page(url).await?;
    let doc = extract_document(reader, &html, url);
    info!(words = doc.word_count, "Extracted article");
    Ok(doc)
}
