//! HTTP(S) variant: scheme matcher and curl setup.

use super::sftp::has_scheme;
use super::TransferError;

/// Resolved HTTP options handed to the downloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Skip TLS certificate and host name verification.
    pub ignore_ssl_errors: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            ignore_ssl_errors: true,
        }
    }
}

/// True for `http://` and `https://` URLs.
pub fn handles(url: &str) -> bool {
    has_scheme(url, "http://") || has_scheme(url, "https://")
}

pub(super) fn configure(
    easy: &mut curl::easy::Easy,
    opts: &HttpOptions,
    max_redirections: u32,
) -> Result<(), TransferError> {
    easy.follow_location(true)?;
    easy.max_redirections(max_redirections)?;
    if let Some(user) = &opts.username {
        easy.username(user)?;
        easy.password(opts.password.as_deref().unwrap_or(""))?;
    }
    if opts.ignore_ssl_errors {
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_http_and_https() {
        assert!(handles("http://host/f"));
        assert!(handles("https://host/f"));
        assert!(handles("HTTPS://host/f"));
        assert!(!handles("httpx://host/f"));
        assert!(!handles("sftp://host/f"));
    }
}
