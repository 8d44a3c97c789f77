//! Rendering and writing of command results.
//!
//! # Submodules
//!
//! - [`json`]: serializes results as compact or pretty JSON
//! - [`markdown`]: human-readable reports of topics and documents
//!
//! Results go to stdout unless an output path is given, in which case the
//! parent directories are created first.

pub mod json;
pub mod markdown;

use crate::error::NewsError;
use crate::utils::ensure_parent_dir;
use clap::ValueEnum;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Markdown,
}

/// Write `rendered` to `path`, or to stdout when no path is given.
#[instrument(level = "info", skip_all, fields(path = ?path))]
pub async fn emit(rendered: &str, path: Option<&Path>) -> Result<(), NewsError> {
    match path {
        Some(path) => {
            ensure_parent_dir(path).await?;
            fs::write(path, rendered).await?;
            info!(path = %path.display(), bytes = rendered.len(), "Wrote output file");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}
