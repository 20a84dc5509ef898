//! Resolution entries: one declared source with a lazily produced file.
//!
//! The file is produced at most once per entry. The state cell is a mutex
//! plus condvar; the first caller to find the entry `Unresolved` (or `Failed`)
//! flips it to `Resolving` and does the work, everyone else waits and sees
//! the same outcome.

use std::path::{Path, PathBuf};
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::cache::download_cached;
use crate::download::Downloader;
use crate::error::ResolveError;
use crate::lookup::ConfigLookup;
use crate::source::FileSource;

/// Resolution progress of one entry.
#[derive(Debug, Clone)]
pub enum ResolveState {
    Unresolved,
    Resolving,
    Resolved(PathBuf),
    /// Last attempt failed; the next request tries again.
    Failed(ResolveError),
}

#[derive(Debug)]
pub struct ResolutionEntry {
    id: String,
    group: String,
    target_dir: PathBuf,
    source: FileSource,
    state: Mutex<ResolveState>,
    ready: Condvar,
}

impl ResolutionEntry {
    /// Identity and target directory are fixed here; nothing touches the disk.
    pub(crate) fn new(source: FileSource, group: &str, download_dir: &Path) -> Self {
        let id = source.identity();
        let target_dir = download_dir.join(&id);
        ResolutionEntry {
            id,
            group: group.to_string(),
            target_dir,
            source,
            state: Mutex::new(ResolveState::Unresolved),
            ready: Condvar::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// `<download_dir>/<id>`; exists only once a remote source was resolved.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn state(&self) -> ResolveState {
        self.lock().clone()
    }

    /// The memoized file, if resolution already succeeded.
    pub fn resolved_file(&self) -> Option<PathBuf> {
        match &*self.lock() {
            ResolveState::Resolved(path) => Some(path.clone()),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResolveState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the entry's file, producing it on first use.
    ///
    /// Concurrent callers block until the producing thread finishes and get
    /// its result. After a failure the next call retries.
    pub fn resolve(
        &self,
        downloader: &dyn Downloader,
        lookup: &dyn ConfigLookup,
    ) -> Result<PathBuf, ResolveError> {
        let mut state = self.lock();
        let mut waited = false;
        loop {
            let in_progress = match &*state {
                ResolveState::Resolved(path) => return Ok(path.clone()),
                ResolveState::Failed(err) if waited => return Err(err.clone()),
                ResolveState::Resolving => true,
                ResolveState::Unresolved | ResolveState::Failed(_) => false,
            };
            if !in_progress {
                break;
            }
            waited = true;
            state = self.ready.wait(state).unwrap_or_else(|e| e.into_inner());
        }
        *state = ResolveState::Resolving;
        drop(state);

        let mut guard = ResolvingGuard {
            entry: self,
            finished: false,
        };
        let outcome = self.produce(downloader, lookup);
        guard.finish(match &outcome {
            Ok(path) => ResolveState::Resolved(path.clone()),
            Err(err) => ResolveState::Failed(err.clone()),
        });
        outcome
    }

    fn produce(
        &self,
        downloader: &dyn Downloader,
        lookup: &dyn ConfigLookup,
    ) -> Result<PathBuf, ResolveError> {
        match &self.source {
            FileSource::Local(path) => Ok(path.clone()),
            FileSource::Remote { url, via } => download_cached(url, &self.target_dir, |dest| {
                downloader.fetch(&via.request(url, lookup), dest)
            }),
        }
    }
}

/// Publishes the outcome of a resolution and wakes waiters. If the producer
/// panics, the entry goes back to `Unresolved` so waiters do not hang.
struct ResolvingGuard<'a> {
    entry: &'a ResolutionEntry,
    finished: bool,
}

impl ResolvingGuard<'_> {
    fn finish(&mut self, state: ResolveState) {
        *self.entry.lock() = state;
        self.finished = true;
        self.entry.ready.notify_all();
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.entry.lock() = ResolveState::Unresolved;
            self.entry.ready.notify_all();
        }
    }
}
