//! Caller-supplied credentials and their configuration fallbacks.
//!
//! Every field is optional. Fields left unset are filled from the
//! [`ConfigLookup`] right before a transfer, never at declaration time, so
//! the source identity only covers what the caller actually wrote.

use crate::download::{HttpOptions, SftpOptions, SmbOptions};
use crate::lookup::{self, ConfigLookup};

/// Default for `sftp.hostChecking` when unset or unparseable.
pub const SFTP_HOST_CHECKING_DEFAULT: bool = false;
/// Default for `http.ignoreSSL` when unset or unparseable.
pub const HTTP_IGNORE_SSL_DEFAULT: bool = true;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SftpAuth {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host_checking: Option<bool>,
}

impl SftpAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            host_checking: None,
        }
    }

    pub fn host_checking(mut self, enabled: bool) -> Self {
        self.host_checking = Some(enabled);
        self
    }

    pub fn resolve(&self, lookup: &dyn ConfigLookup) -> SftpOptions {
        SftpOptions {
            username: self
                .username
                .clone()
                .or_else(|| lookup.get(lookup::SFTP_USERNAME)),
            password: self
                .password
                .clone()
                .or_else(|| lookup.get(lookup::SFTP_PASSWORD)),
            host_checking: self.host_checking.unwrap_or_else(|| {
                lookup::get_bool(lookup, lookup::SFTP_HOST_CHECKING, SFTP_HOST_CHECKING_DEFAULT)
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SmbAuth {
    pub domain: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmbAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            domain: None,
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn resolve(&self, lookup: &dyn ConfigLookup) -> SmbOptions {
        SmbOptions {
            domain: self.domain.clone().or_else(|| lookup.get(lookup::SMB_DOMAIN)),
            username: self
                .username
                .clone()
                .or_else(|| lookup.get(lookup::SMB_USERNAME)),
            password: self
                .password
                .clone()
                .or_else(|| lookup.get(lookup::SMB_PASSWORD)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HttpAuth {
    pub username: Option<String>,
    pub password: Option<String>,
    pub ignore_ssl: Option<bool>,
}

impl HttpAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ignore_ssl: None,
        }
    }

    pub fn ignore_ssl(mut self, ignore: bool) -> Self {
        self.ignore_ssl = Some(ignore);
        self
    }

    pub fn resolve(&self, lookup: &dyn ConfigLookup) -> HttpOptions {
        HttpOptions {
            username: self
                .username
                .clone()
                .or_else(|| lookup.get(lookup::HTTP_USERNAME)),
            password: self
                .password
                .clone()
                .or_else(|| lookup.get(lookup::HTTP_PASSWORD)),
            ignore_ssl_errors: self.ignore_ssl.unwrap_or_else(|| {
                lookup::get_bool(lookup, lookup::HTTP_IGNORE_SSL, HTTP_IGNORE_SSL_DEFAULT)
            }),
        }
    }
}
