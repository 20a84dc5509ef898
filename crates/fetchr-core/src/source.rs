//! Declared file sources and their identities.

use std::path::PathBuf;

use crate::credentials::{HttpAuth, SftpAuth, SmbAuth};
use crate::download::{DownloaderOptions, FetchRequest, HttpOptions, Protocol, SftpOptions, SmbOptions};
use crate::identity::IdentityHasher;
use crate::lookup::ConfigLookup;

/// How a remote source is fetched.
///
/// `None` credentials select the plain variant: built-in defaults, no
/// configuration fallback. `Some` (even empty) selects the authenticated
/// variant, where every unset field falls back to configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteVia {
    Sftp(Option<SftpAuth>),
    Smb(Option<SmbAuth>),
    Http(Option<HttpAuth>),
    Url,
}

impl RemoteVia {
    pub fn protocol(&self) -> Protocol {
        match self {
            RemoteVia::Sftp(_) => Protocol::Sftp,
            RemoteVia::Smb(_) => Protocol::Smb,
            RemoteVia::Http(_) => Protocol::Http,
            RemoteVia::Url => Protocol::Url,
        }
    }

    /// Transfer request for `url`, filling unset credentials from `lookup`.
    pub fn request(&self, url: &str, lookup: &dyn ConfigLookup) -> FetchRequest {
        let options = match self {
            RemoteVia::Sftp(auth) => DownloaderOptions::Sftp(
                auth.as_ref().map_or_else(SftpOptions::default, |a| a.resolve(lookup)),
            ),
            RemoteVia::Smb(auth) => DownloaderOptions::Smb(
                auth.as_ref().map_or_else(SmbOptions::default, |a| a.resolve(lookup)),
            ),
            RemoteVia::Http(auth) => DownloaderOptions::Http(
                auth.as_ref().map_or_else(HttpOptions::default, |a| a.resolve(lookup)),
            ),
            RemoteVia::Url => DownloaderOptions::Url,
        };
        FetchRequest {
            url: url.to_string(),
            options,
        }
    }

    /// Authenticated variant with nothing explicit, as used by URL dispatch.
    pub fn with_configured_auth(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Sftp => RemoteVia::Sftp(Some(SftpAuth::default())),
            Protocol::Smb => RemoteVia::Smb(Some(SmbAuth::default())),
            Protocol::Http => RemoteVia::Http(Some(HttpAuth::default())),
            Protocol::Url => RemoteVia::Url,
        }
    }
}

/// A declared file: a local path or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileSource {
    /// Absolute local path, used as is.
    Local(PathBuf),
    Remote { url: String, via: RemoteVia },
}

impl FileSource {
    pub fn remote(url: impl Into<String>, via: RemoteVia) -> Self {
        FileSource::Remote {
            url: url.into(),
            via,
        }
    }

    /// Tag naming the kind of source; part of the identity.
    pub fn kind(&self) -> &'static str {
        match self {
            FileSource::Local(_) => "local",
            FileSource::Remote { via, .. } => match via {
                RemoteVia::Sftp(None) => "sftp",
                RemoteVia::Sftp(Some(_)) => "sftp-auth",
                RemoteVia::Smb(None) => "smb",
                RemoteVia::Smb(Some(_)) => "smb-auth",
                RemoteVia::Http(None) => "http",
                RemoteVia::Http(Some(_)) => "http-auth",
                RemoteVia::Url => "url",
            },
        }
    }

    /// Deterministic identity over every input the caller supplied.
    pub fn identity(&self) -> String {
        let mut h = IdentityHasher::new(self.kind());
        match self {
            FileSource::Local(path) => {
                h.bytes(path.as_os_str().as_encoded_bytes());
            }
            FileSource::Remote { url, via } => {
                h.str(url);
                match via {
                    RemoteVia::Sftp(Some(auth)) => {
                        h.opt_str(auth.username.as_deref())
                            .opt_str(auth.password.as_deref())
                            .opt_bool(auth.host_checking);
                    }
                    RemoteVia::Smb(Some(auth)) => {
                        h.opt_str(auth.domain.as_deref())
                            .opt_str(auth.username.as_deref())
                            .opt_str(auth.password.as_deref());
                    }
                    RemoteVia::Http(Some(auth)) => {
                        h.opt_str(auth.username.as_deref())
                            .opt_str(auth.password.as_deref())
                            .opt_bool(auth.ignore_ssl);
                    }
                    RemoteVia::Sftp(None) | RemoteVia::Smb(None) | RemoteVia::Http(None) | RemoteVia::Url => {}
                }
            }
        }
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{self, MapLookup};

    fn http_auth(user: Option<&str>, pass: Option<&str>, ignore: Option<bool>) -> FileSource {
        FileSource::remote(
            "https://example.test/pkg.zip",
            RemoteVia::Http(Some(HttpAuth {
                username: user.map(String::from),
                password: pass.map(String::from),
                ignore_ssl: ignore,
            })),
        )
    }

    #[test]
    fn identical_inputs_share_identity() {
        assert_eq!(
            http_auth(Some("u"), Some("p"), None).identity(),
            http_auth(Some("u"), Some("p"), None).identity()
        );
    }

    #[test]
    fn every_input_changes_identity() {
        let base = http_auth(Some("u"), Some("p"), None).identity();
        assert_ne!(base, http_auth(Some("v"), Some("p"), None).identity());
        assert_ne!(base, http_auth(Some("u"), Some("q"), None).identity());
        assert_ne!(base, http_auth(Some("u"), Some("p"), Some(false)).identity());
        assert_ne!(base, http_auth(None, Some("p"), None).identity());
        let other_url = FileSource::remote(
            "https://example.test/other.zip",
            RemoteVia::Http(Some(HttpAuth::login("u", "p"))),
        );
        assert_ne!(base, other_url.identity());
    }

    #[test]
    fn plain_and_authenticated_variants_differ() {
        let plain = FileSource::remote("sftp://host/f", RemoteVia::Sftp(None));
        let auth = FileSource::remote("sftp://host/f", RemoteVia::Sftp(Some(SftpAuth::default())));
        assert_eq!(plain.kind(), "sftp");
        assert_eq!(auth.kind(), "sftp-auth");
        assert_ne!(plain.identity(), auth.identity());
    }

    #[test]
    fn local_identity_uses_raw_path_bytes() {
        let local = FileSource::Local(PathBuf::from("/opt/pkg.zip"));
        assert_eq!(local.kind(), "local");
        assert_eq!(local.identity(), FileSource::Local(PathBuf::from("/opt/pkg.zip")).identity());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_keep_distinct_identities() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        // Both bytes decode lossily to U+FFFD.
        let a = FileSource::Local(PathBuf::from(OsStr::from_bytes(b"/opt/\xff.zip")));
        let b = FileSource::Local(PathBuf::from(OsStr::from_bytes(b"/opt/\xfe.zip")));
        assert_eq!(
            PathBuf::from(OsStr::from_bytes(b"/opt/\xff.zip")).to_string_lossy(),
            PathBuf::from(OsStr::from_bytes(b"/opt/\xfe.zip")).to_string_lossy()
        );
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn plain_variant_ignores_configuration() {
        let cfg = MapLookup::new()
            .with(lookup::SMB_USERNAME, "svc")
            .with(lookup::HTTP_IGNORE_SSL, "false");
        assert_eq!(
            RemoteVia::Smb(None).request("smb://nas/share/f.zip", &cfg).options,
            DownloaderOptions::Smb(SmbOptions::default())
        );
        assert_eq!(
            RemoteVia::Http(None).request("https://example.test/f", &cfg).options,
            DownloaderOptions::Http(HttpOptions::default())
        );

        let auth = RemoteVia::Smb(Some(SmbAuth::new()));
        let request = auth.request("smb://nas/share/f.zip", &cfg);
        assert_eq!(request.url, "smb://nas/share/f.zip");
        match request.options {
            DownloaderOptions::Smb(opts) => assert_eq!(opts.username.as_deref(), Some("svc")),
            other => panic!("unexpected options: {:?}", other),
        }
    }
}
