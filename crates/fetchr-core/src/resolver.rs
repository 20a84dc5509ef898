//! File resolver: the ordered registry of declared files.
//!
//! Declarations are cheap and never fail: they compute the identity and the
//! target directory and append an entry. Files are produced on first read
//! (`all_files`, `grouped_files`, `resolve`), once per entry.
//!
//! ```no_run
//! use std::sync::Arc;
//! use fetchr_core::download::CurlDownloader;
//! use fetchr_core::lookup::EnvLookup;
//! use fetchr_core::resolver::{all_groups, Declare, FileResolver};
//!
//! let resolver = FileResolver::new(
//!     "/var/cache/fetchr",
//!     Arc::new(CurlDownloader::default()),
//!     Arc::new(EnvLookup::new()),
//! );
//! resolver.url("https://example.test/pkg.zip");
//! resolver
//!     .group("vendor", |g| {
//!         g.url("sftp://files.example.test/vendor/lib.zip");
//!         g.local("dist/app.zip");
//!     })
//!     .unwrap();
//! let files = resolver.all_files(all_groups).unwrap();
//! # let _ = files;
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::ThreadId;

use indexmap::IndexMap;

use crate::config::FetchrConfig;
use crate::credentials::{HttpAuth, SftpAuth, SmbAuth};
use crate::download::{classify, CurlDownloader, CurlOptions, Downloader};
use crate::entry::ResolutionEntry;
use crate::error::ResolveError;
use crate::group::GroupScope;
use crate::identity;
use crate::lookup::{ConfigLookup, EnvLookup, LayeredLookup};
use crate::source::{FileSource, RemoteVia};

/// Group of entries declared outside any named group.
pub const GROUP_DEFAULT: &str = "default";

/// Filter accepting every group.
pub fn all_groups(_group: &str) -> bool {
    true
}

/// Declaration surface shared by the resolver (default group) and group scopes.
pub trait Declare {
    /// Registers `source` and returns its entry.
    fn declare(&self, source: FileSource) -> Arc<ResolutionEntry>;

    /// Local file used as is. Relative paths are made absolute; existence is not checked.
    fn local(&self, path: impl AsRef<Path>) -> Arc<ResolutionEntry> {
        self.declare(FileSource::Local(path.as_ref().to_path_buf()))
    }

    /// Picks the variant from the URL shape (SFTP, SMB, HTTP, other URL, else
    /// local path). Remote variants take their credentials from configuration.
    fn url(&self, url: &str) -> Arc<ResolutionEntry> {
        match classify(url) {
            Some(protocol) => self.declare(FileSource::remote(url, RemoteVia::with_configured_auth(protocol))),
            None => self.local(url),
        }
    }

    fn sftp(&self, url: &str) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Sftp(None)))
    }

    fn sftp_auth(&self, url: &str, auth: SftpAuth) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Sftp(Some(auth))))
    }

    fn smb(&self, url: &str) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Smb(None)))
    }

    fn smb_auth(&self, url: &str, auth: SmbAuth) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Smb(Some(auth))))
    }

    fn http(&self, url: &str) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Http(None)))
    }

    fn http_auth(&self, url: &str, auth: HttpAuth) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Http(Some(auth))))
    }

    fn generic_url(&self, url: &str) -> Arc<ResolutionEntry> {
        self.declare(FileSource::remote(url, RemoteVia::Url))
    }
}

/// Ordered registry of declared files for one download directory.
pub struct FileResolver {
    download_dir: PathBuf,
    base_dir: Option<PathBuf>,
    downloader: Arc<dyn Downloader>,
    lookup: Arc<dyn ConfigLookup>,
    entries: RwLock<Vec<Arc<ResolutionEntry>>>,
    /// Group names ever opened on this resolver.
    groups: Mutex<HashSet<String>>,
    /// Thread running a group body, and that group's name.
    group_owner: Mutex<Option<(ThreadId, String)>>,
}

impl FileResolver {
    pub fn new(
        download_dir: impl Into<PathBuf>,
        downloader: Arc<dyn Downloader>,
        lookup: Arc<dyn ConfigLookup>,
    ) -> Self {
        FileResolver {
            download_dir: download_dir.into(),
            base_dir: None,
            downloader,
            lookup,
            entries: RwLock::new(Vec::new()),
            groups: Mutex::new(HashSet::new()),
            group_owner: Mutex::new(None),
        }
    }

    /// Resolver with a curl downloader tuned from `cfg`; credentials come from
    /// `FETCHR_*` environment variables first, then the config file tables.
    pub fn from_config(cfg: &FetchrConfig) -> anyhow::Result<Self> {
        let download_dir = cfg.download_dir()?;
        let lookup = LayeredLookup::new().layer(EnvLookup::new()).layer(cfg.lookup());
        Ok(FileResolver::new(
            download_dir,
            Arc::new(CurlDownloader::new(CurlOptions::from(cfg))),
            Arc::new(lookup),
        ))
    }

    /// Directory relative local paths are resolved against (default: the
    /// process working directory).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.base_dir {
            Some(base) => base.join(path),
            None => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
        }
    }

    pub(crate) fn push(&self, source: FileSource, group: &str) -> Arc<ResolutionEntry> {
        let source = match source {
            FileSource::Local(path) => FileSource::Local(self.absolute(&path)),
            remote => remote,
        };
        let entry = Arc::new(ResolutionEntry::new(source, group, &self.download_dir));
        tracing::debug!(id = entry.id(), group, kind = entry.source().kind(), "declared file");
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::clone(&entry));
        entry
    }

    /// Runs `body` with a scope whose declarations belong to group `name`.
    ///
    /// Each name can be opened once per resolver; a second attempt (or a name
    /// already carried by entries, such as `"default"`) fails without running
    /// `body` and leaves existing entries untouched.
    ///
    /// Group blocks are serialized: the group lock is held until `body`
    /// returns or unwinds. Default-group declarations never wait on it.
    /// Opening a group from inside another group's body is an error.
    pub fn group<T>(&self, name: &str, body: impl FnOnce(&GroupScope<'_>) -> T) -> Result<T, ResolveError> {
        let me = std::thread::current().id();
        if let Some((owner, outer)) = &*self.group_owner.lock().unwrap_or_else(|e| e.into_inner()) {
            if *owner == me {
                return Err(ResolveError::NestedGroup {
                    name: name.to_string(),
                    outer: outer.clone(),
                });
            }
        }

        let mut opened = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        let in_use = opened.contains(name)
            || self
                .entries
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .any(|e| e.group() == name);
        if in_use {
            return Err(ResolveError::DuplicateGroup {
                name: name.to_string(),
                download_dir: self.download_dir.clone(),
            });
        }
        opened.insert(name.to_string());
        *self.group_owner.lock().unwrap_or_else(|e| e.into_inner()) = Some((me, name.to_string()));
        tracing::debug!(group = name, "declaring group");
        let scope = GroupScope::new(self, name, opened);
        Ok(body(&scope))
    }

    /// Called by `GroupScope` on drop, while it still holds the group lock.
    pub(crate) fn release_group_owner(&self) {
        *self.group_owner.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Snapshot of all entries in declaration order.
    pub fn entries(&self) -> Vec<Arc<ResolutionEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn filtered(&self, filter: impl Fn(&str) -> bool) -> Vec<Arc<ResolutionEntry>> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| filter(e.group()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True once anything was declared.
    pub fn is_configured(&self) -> bool {
        self.len() > 0
    }

    /// Hash over all entry identities in declaration order. Stable across
    /// runs and resolutions; changes only when declarations change.
    pub fn configuration_fingerprint(&self) -> String {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        identity::fingerprint(entries.iter().map(|e| e.id()))
    }

    /// Target directories of matching entries. Never triggers a download.
    pub fn output_dirs(&self, filter: impl Fn(&str) -> bool) -> Vec<PathBuf> {
        self.filtered(filter)
            .iter()
            .map(|e| e.target_dir().to_path_buf())
            .collect()
    }

    /// Produces (or reuses) the file of one entry.
    pub fn resolve(&self, entry: &ResolutionEntry) -> Result<PathBuf, ResolveError> {
        entry.resolve(self.downloader.as_ref(), self.lookup.as_ref())
    }

    /// Files of matching entries in declaration order, downloading as needed.
    ///
    /// Every matching entry is attempted; if any failed, the first failure is
    /// returned and the successful ones stay cached for the next call.
    pub fn all_files(&self, filter: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, ResolveError> {
        self.resolve_all(&self.filtered(filter))
            .map(|resolved| resolved.into_iter().map(|(_, path)| path).collect())
    }

    /// Like `all_files`, partitioned by group. Groups keep the order of their
    /// first declared entry.
    pub fn grouped_files(
        &self,
        filter: impl Fn(&str) -> bool,
    ) -> Result<IndexMap<String, Vec<PathBuf>>, ResolveError> {
        let resolved = self.resolve_all(&self.filtered(filter))?;
        let mut grouped: IndexMap<String, Vec<PathBuf>> = IndexMap::new();
        for (group, path) in resolved {
            grouped.entry(group).or_default().push(path);
        }
        Ok(grouped)
    }

    fn resolve_all(&self, entries: &[Arc<ResolutionEntry>]) -> Result<Vec<(String, PathBuf)>, ResolveError> {
        let mut resolved = Vec::with_capacity(entries.len());
        let mut first_error = None;
        for entry in entries {
            match self.resolve(entry) {
                Ok(path) => resolved.push((entry.group().to_string(), path)),
                Err(e) => {
                    tracing::warn!(id = entry.id(), error = %e, "failed to resolve file");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(resolved),
        }
    }
}

impl Declare for FileResolver {
    fn declare(&self, source: FileSource) -> Arc<ResolutionEntry> {
        self.push(source, GROUP_DEFAULT)
    }
}

impl std::fmt::Debug for FileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileResolver")
            .field("download_dir", &self.download_dir)
            .field("entries", &self.len())
            .finish()
    }
}
