//! Downloader capability and protocol dispatch.
//!
//! A `Downloader` turns a `FetchRequest` into bytes in a destination file. The
//! engine only sees the trait; `CurlDownloader` is the shipped implementation.
//! Which variant a URL belongs to is decided by `DISPATCH_ORDER`, an ordered
//! table of `(Protocol, matcher)` pairs where the first match wins.

mod backend;
mod error;
pub mod generic;
pub mod http;
pub mod sftp;
pub mod smb;

pub use backend::{CurlDownloader, CurlOptions};
pub use error::TransferError;
pub use http::HttpOptions;
pub use sftp::SftpOptions;
pub use smb::SmbOptions;

use std::fmt;
use std::path::Path;

/// Remote transfer protocols known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Sftp,
    Smb,
    Http,
    /// Any other URL scheme (`file://`, `ftp://`, ...).
    Url,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Sftp => "sftp",
            Protocol::Smb => "smb",
            Protocol::Http => "http",
            Protocol::Url => "url",
        }
    }

    /// The variant's own matcher.
    pub fn handles(self, url: &str) -> bool {
        match self {
            Protocol::Sftp => sftp::handles(url),
            Protocol::Smb => smb::handles(url),
            Protocol::Http => http::handles(url),
            Protocol::Url => generic::handles(url),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matchers in priority order. The generic URL matcher accepts every scheme,
/// so it must stay after the specific ones.
pub const DISPATCH_ORDER: [(Protocol, fn(&str) -> bool); 4] = [
    (Protocol::Sftp, sftp::handles),
    (Protocol::Smb, smb::handles),
    (Protocol::Http, http::handles),
    (Protocol::Url, generic::handles),
];

/// Classifies `url` against `DISPATCH_ORDER`. `None` means a local filesystem path.
pub fn classify(url: &str) -> Option<Protocol> {
    DISPATCH_ORDER
        .iter()
        .find(|(_, matches)| matches(url))
        .map(|(protocol, _)| *protocol)
}

/// Fully resolved per-variant options (credentials already defaulted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloaderOptions {
    Sftp(SftpOptions),
    Smb(SmbOptions),
    Http(HttpOptions),
    Url,
}

impl DownloaderOptions {
    pub fn protocol(&self) -> Protocol {
        match self {
            DownloaderOptions::Sftp(_) => Protocol::Sftp,
            DownloaderOptions::Smb(_) => Protocol::Smb,
            DownloaderOptions::Http(_) => Protocol::Http,
            DownloaderOptions::Url => Protocol::Url,
        }
    }
}

/// One transfer: source URL plus the options of the variant that handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub options: DownloaderOptions,
}

/// Transfer capability. Implementations must write the complete remote content
/// to `dest` or return an error; partial files left behind are cleaned up by
/// the caller on the next attempt.
pub trait Downloader: Send + Sync {
    fn fetch(&self, request: &FetchRequest, dest: &Path) -> Result<(), TransferError>;
}
