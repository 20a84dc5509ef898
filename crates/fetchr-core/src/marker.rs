//! Completion marker: JSON record written next to a finished download.
//!
//! Presence of the marker means the last transfer into its directory
//! completed. A downloaded file without a marker is a leftover of an
//! interrupted transfer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Marker file name inside each entry's target directory. Derived download
/// names never start with a dot, so this cannot collide with one.
pub const COMPLETION_MARKER: &str = ".download-complete.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMarker {
    #[serde(default = "default_version")]
    pub version: u8,
    /// When the transfer finished (UTC, RFC 3339 on disk).
    pub downloaded: DateTime<Utc>,
}

fn default_version() -> u8 {
    1
}

impl CompletionMarker {
    pub fn now() -> Self {
        Self {
            version: 1,
            downloaded: Utc::now(),
        }
    }

    /// Path of the marker for `target_dir`.
    pub fn path_in(target_dir: &Path) -> PathBuf {
        target_dir.join(COMPLETION_MARKER)
    }

    /// Writes the marker as pretty JSON, replacing any previous one.
    pub fn write(&self, path: &Path) -> Result<(), ResolveError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ResolveError::Marker {
            path: path.to_path_buf(),
            source: std::sync::Arc::new(e),
        })?;
        std::fs::write(path, json).map_err(|e| ResolveError::io("write completion marker", path, e))
    }

    /// Reads a marker for diagnostics. Missing or unreadable markers yield `None`.
    pub fn read(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
