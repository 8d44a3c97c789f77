//! Small string, URL and filesystem helpers.
//!
//! - Log-friendly truncation of long payloads
//! - Whitespace normalization for extracted text
//! - Hostname cleanup for source names
//! - Output-path preparation

use itertools::Itertools;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a character
/// boundary) with an ellipsis and the count of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Replace every run of whitespace with a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Trimmed copy of `s`, or `None` if nothing is left.
pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Hostname of `url` with a leading `www.` removed.
///
/// ```ignore
/// assert_eq!(host_without_www("https://www.bbc.co.uk/news"), Some("bbc.co.uk".into()));
/// ```
pub fn host_without_www(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    non_empty(host.strip_prefix("www.").unwrap_or(host))
}

/// Make sure the parent directory of an output file exists.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            info!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        let s = "ééééé";
        assert_eq!(truncate_for_log(s, 3), "é…(+8 bytes)");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  x "), Some("x".to_string()));
        assert_eq!(non_empty(" \t"), None);
    }

    #[test]
    fn test_host_without_www() {
        assert_eq!(
            host_without_www("https://www.example.com/a?b=c"),
            Some("example.com".to_string())
        );
        assert_eq!(
            host_without_www("http://wwwfoo.example.com/"),
            Some("wwwfoo.example.com".to_string())
        );
        assert_eq!(host_without_www("mailto:someone@example.com"), None);
        assert_eq!(host_without_www("::nope::"), None);
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested() {
        let root = std::env::temp_dir().join(format!("news_topics_test_{}", std::process::id()));
        let file = root.join("a/b/out.json");
        ensure_parent_dir(&file).await.unwrap();
        assert!(root.join("a/b").is_dir());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_filename() {
        ensure_parent_dir(Path::new("out.json")).await.unwrap();
    }
}
