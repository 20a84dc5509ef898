//! Transfer error type returned by every downloader variant.

use std::path::PathBuf;

/// Error returned by a single `Downloader::fetch` (curl failure, bad status, or local write failure).
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Curl reported an error (connection, authentication, timeout, remote not found...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {code}")]
    Status { code: u32 },
    /// Writing the received body to the destination file failed.
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failure reported by a downloader that is not backed by curl.
    #[error("{0}")]
    Other(String),
}

impl TransferError {
    /// True for failures caused by the remote side answering with an error status.
    pub fn is_status(&self) -> bool {
        matches!(self, TransferError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_status_and_write() {
        let e = TransferError::Status { code: 404 };
        assert_eq!(e.to_string(), "HTTP 404");
        assert!(e.is_status());

        let e = TransferError::Write {
            path: PathBuf::from("/tmp/pkg.zip"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(e.to_string(), "write /tmp/pkg.zip: disk full");
        assert!(std::error::Error::source(&e).is_some());
    }
}
