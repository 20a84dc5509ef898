//! SFTP variant: scheme matcher and curl setup.

use std::ffi::CString;
use std::path::PathBuf;

use super::TransferError;

/// Resolved SFTP connection options handed to the downloader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SftpOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Enforce the user's SSH known-hosts file when true.
    pub host_checking: bool,
}

/// True for `sftp://` URLs.
pub fn handles(url: &str) -> bool {
    has_scheme(url, "sftp://")
}

pub(super) fn has_scheme(url: &str, prefix: &str) -> bool {
    url.len() >= prefix.len()
        && url.is_char_boundary(prefix.len())
        && url[..prefix.len()].eq_ignore_ascii_case(prefix)
}

pub(super) fn configure(easy: &mut curl::easy::Easy, opts: &SftpOptions) -> Result<(), TransferError> {
    if let Some(user) = &opts.username {
        easy.username(user)?;
    }
    if let Some(pass) = &opts.password {
        easy.password(pass)?;
    }
    if opts.host_checking {
        if let Some(known_hosts) = known_hosts_path() {
            set_known_hosts(easy, &known_hosts)?;
        } else {
            tracing::warn!("sftp host checking requested but no home directory to find known_hosts");
        }
    }
    Ok(())
}

fn known_hosts_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".ssh").join("known_hosts"))
}

/// `curl::easy::Easy` has no setter for CURLOPT_SSH_KNOWNHOSTS, so it goes through the raw handle.
fn set_known_hosts(easy: &mut curl::easy::Easy, path: &std::path::Path) -> Result<(), TransferError> {
    let value = CString::new(path.to_string_lossy().into_owned())
        .map_err(|_| TransferError::Other(format!("invalid known_hosts path: {}", path.display())))?;
    // libcurl copies string options, so `value` only has to outlive the call.
    let rc = unsafe {
        curl_sys::curl_easy_setopt(easy.raw(), curl_sys::CURLOPT_SSH_KNOWNHOSTS, value.as_ptr())
    };
    if rc != curl_sys::CURLE_OK {
        return Err(TransferError::Curl(curl::Error::new(rc)));
    }
    Ok(())
}
