//! SMB variant: scheme matcher and curl setup.

use super::sftp::has_scheme;
use super::TransferError;

/// Resolved SMB connection options handed to the downloader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmbOptions {
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmbOptions {
    /// User name as libcurl expects it for NTLM: `DOMAIN\user` when a domain is set.
    pub fn qualified_username(&self) -> Option<String> {
        let user = self.username.as_deref()?;
        match self.domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => Some(format!("{}\\{}", domain, user)),
            None => Some(user.to_string()),
        }
    }
}

/// True for `smb://` URLs.
pub fn handles(url: &str) -> bool {
    has_scheme(url, "smb://")
}

pub(super) fn configure(easy: &mut curl::easy::Easy, opts: &SmbOptions) -> Result<(), TransferError> {
    if let Some(user) = opts.qualified_username() {
        easy.username(&user)?;
    }
    if let Some(pass) = &opts.password {
        easy.password(pass)?;
    }
    Ok(())
}
