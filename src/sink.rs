//! Persists serialized reports to the reports directory.

use crate::{utils, Result};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::info;

/// The file name a report is written to when the caller does not choose one.
pub const DEFAULT_REPORT_FILE: &str = "report.json";

/// Writes `text` to `dir/filename`, replacing any existing file. `dir` is created if it is
/// missing. Returns the path that was written.
pub async fn write_report(dir: &Path, filename: &str, text: &str) -> Result<PathBuf> {
    if filename.trim().is_empty() {
        bail!("The report file name is empty")
    }
    utils::make_dir(dir)
        .await
        .context("Unable to create the reports directory")?;
    let path = dir.join(filename);
    utils::write(&path, text)
        .await
        .context("Unable to write the report")?;
    info!("Report written to {}", path.display());
    Ok(path)
}
