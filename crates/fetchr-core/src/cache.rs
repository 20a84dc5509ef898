//! Transfer-with-cache: fetch into a target directory at most once.
//!
//! Invalidation is existence based only. A file with a completion marker is
//! never fetched again, even if the remote copy changed; a different URL or
//! credentials give a different target directory.

use std::path::{Path, PathBuf};

use crate::download::TransferError;
use crate::error::ResolveError;
use crate::marker::CompletionMarker;
use crate::url_model::derive_filename;

/// Returns the cached download of `url` inside `target_dir`, calling `fetch`
/// only when no completed download is present.
///
/// A file found without a completion marker is a remnant of an interrupted
/// transfer and is deleted before fetching again.
pub fn download_cached<F>(url: &str, target_dir: &Path, fetch: F) -> Result<PathBuf, ResolveError>
where
    F: FnOnce(&Path) -> Result<(), TransferError>,
{
    std::fs::create_dir_all(target_dir)
        .map_err(|e| ResolveError::io("create directory", target_dir, e))?;

    let file = target_dir.join(derive_filename(url));
    let marker = CompletionMarker::path_in(target_dir);

    if !marker.exists() && file.exists() {
        tracing::warn!(file = %file.display(), "removing incomplete download");
        std::fs::remove_file(&file).map_err(|e| ResolveError::io("remove incomplete download", &file, e))?;
    }

    if file.exists() {
        tracing::debug!(url, file = %file.display(), "using cached download");
        return Ok(file);
    }

    // The marker must only ever describe the transfer that wrote the current file.
    match std::fs::remove_file(&marker) {
        Ok(()) => tracing::debug!(marker = %marker.display(), "removed marker of missing download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(ResolveError::io("remove completion marker", &marker, e)),
    }

    tracing::debug!(url, file = %file.display(), "downloading");
    fetch(&file).map_err(|e| {
        tracing::warn!(url, error = %e, "download failed");
        ResolveError::transfer(url, e)
    })?;
    CompletionMarker::now().write(&marker)?;
    tracing::info!(url, file = %file.display(), "download complete");

    Ok(file)
}
