//! Saving downloaded blobs to disk

use std::path::{Path, PathBuf};

use crate::error::ClientError;

/// Writes downloaded bytes under `<dir>/<name><extension>`.
///
/// Creates the directory if it does not exist and returns the full path of
/// the written file.
///
/// # Errors
///
/// Returns `ClientError::Save` when the directory or file cannot be
/// written.
pub async fn save_download(
    dir: &Path,
    name: &str,
    extension: &str,
    bytes: &[u8],
) -> Result<PathBuf, ClientError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{name}{extension}"));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
