//! JSON rendering of command results.
//!
//! All result types serialize to exactly the shapes returned to callers:
//! `{hours, count, topics}` for trending requests and the flat
//! `ExtractedDocument` object (or an array of them) for extraction.

use crate::error::NewsError;
use serde::Serialize;

/// Serialize `value`, optionally pretty-printed.
pub fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, NewsError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
