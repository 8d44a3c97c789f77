//! Metadata and selector lookups over a parsed HTML page.

use crate::utils::{collapse_whitespace, non_empty};
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never counts as page content.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub struct Page {
    doc: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// `content` of the first `<meta>` whose `property` or `name` equals `key`.
    ///
    /// Matching is case-insensitive; metas with blank content are skipped.
    pub fn meta(&self, key: &str) -> Option<String> {
        let selector = Selector::parse("meta").ok()?;
        self.doc
            .select(&selector)
            .filter(|el| {
                let attrs = el.value();
                [attrs.attr("property"), attrs.attr("name")]
                    .into_iter()
                    .flatten()
                    .any(|v| v.eq_ignore_ascii_case(key))
            })
            .find_map(|el| el.value().attr("content").and_then(non_empty))
    }

    /// Text of the document `<title>`.
    pub fn title(&self) -> Option<String> {
        let el = self.first("title")?;
        non_empty(&collapse_whitespace(&el.text().collect::<String>()))
    }

    /// `datetime` attribute of the first `<time>` element.
    pub fn time_datetime(&self) -> Option<String> {
        let el = self.first("time")?;
        el.value().attr("datetime").and_then(non_empty)
    }

    /// Text content of the first `tag` element, whitespace collapsed.
    ///
    /// Text nodes are concatenated as they appear, so inline markup inside a
    /// word does not split it.
    pub fn block_text(&self, tag: &str) -> Option<String> {
        self.first(tag).and_then(|el| non_empty(&visible_text(el)))
    }

    fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.doc.select(&selector).next()
    }
}

fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| HIDDEN_TAGS.contains(&a.value().name()));
        if !hidden {
            out.push_str(text);
        }
    }
    collapse_whitespace(&out)
}
