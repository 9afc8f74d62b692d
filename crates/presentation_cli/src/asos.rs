//! ASOS observation download
//!
//! Fetches a window of observations from the Iowa Environmental Mesonet and
//! stores the comma-separated response on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveDateTime};
use integration_weather::{AsosClient, AsosRequest};
use tracing::info;

/// Directory downloads land in when no output path is given
pub const DEFAULT_ASOS_DIR: &str = "asos";

/// Parse a window boundary: `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` or a bare date (midnight)
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(timestamp);
        }
    }
    let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") else {
        bail!("Invalid timestamp '{raw}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM");
    };
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid timestamp '{raw}'"))
}

/// Where a download is written
#[must_use]
pub fn output_path(request: &AsosRequest, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| Path::new(DEFAULT_ASOS_DIR).join(request.file_name()))
}

/// Download `request` and write it to `path`, creating parent directories
pub async fn download_to_file(
    client: &AsosClient,
    request: &AsosRequest,
    path: &Path,
) -> Result<usize> {
    let body = client
        .download(request)
        .await
        .context("ASOS download failed")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    tokio::fs::write(path, body.as_bytes())
        .await
        .with_context(|| format!("Cannot write {}", path.display()))?;

    info!(path = %path.display(), bytes = body.len(), "Saved ASOS observations");
    Ok(body.len())
}
