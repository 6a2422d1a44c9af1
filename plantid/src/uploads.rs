//! Storage of uploaded images on local disk.

use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Reduce a client-supplied file name to something safe to join onto the upload directory.
///
/// Only the last path component survives (both `/` and `\` count as separators), characters
/// outside `[A-Za-z0-9._-]` become `_`, and leading dots are dropped so the result can be neither
/// hidden nor `..`. Returns `None` when nothing is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() { None } else { Some(cleaned.to_string()) }
}

/// Write `bytes` to `dir/filename`, replacing any earlier upload with the same name.
///
/// `filename` must already be sanitised.
#[instrument(skip(bytes), fields(size = bytes.len()))]
pub async fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(filename);

    tokio::fs::write(&path, bytes).await.map_err(|source| Error::Storage {
        path: path.clone(),
        source,
    })?;

    debug!("Stored upload at {}", path.display());
    Ok(path)
}
