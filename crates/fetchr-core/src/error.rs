//! Errors surfaced by the resolver.
//!
//! `ResolveError` is `Clone` so one failed resolution can be reported to every
//! thread that was waiting on it; underlying errors are shared through `Arc`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::download::TransferError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// A group name was opened twice on the same resolver.
    #[error("file group '{name}' is already defined for download dir: {}", download_dir.display())]
    DuplicateGroup { name: String, download_dir: PathBuf },

    /// A group was opened from inside another group's body.
    #[error("file group '{name}' cannot be declared inside file group '{outer}'")]
    NestedGroup { name: String, outer: String },

    /// The downloader failed to fetch `url`.
    #[error("failed to download {url}: {source}")]
    Transfer {
        url: String,
        #[source]
        source: Arc<TransferError>,
    },

    /// Filesystem failure around a download (target dir, stale file, marker).
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The completion marker could not be encoded.
    #[error("failed to encode completion marker {}: {source}", path.display())]
    Marker {
        path: PathBuf,
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl ResolveError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolveError::Io {
            action,
            path: path.into(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn transfer(url: impl Into<String>, source: TransferError) -> Self {
        ResolveError::Transfer {
            url: url.into(),
            source: Arc::new(source),
        }
    }

    /// True for configuration mistakes made while declaring sources.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ResolveError::DuplicateGroup { .. } | ResolveError::NestedGroup { .. }
        )
    }
}
