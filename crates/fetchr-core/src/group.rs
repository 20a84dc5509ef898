//! Named group blocks.

use std::collections::HashSet;
use std::sync::{Arc, MutexGuard};

use crate::entry::ResolutionEntry;
use crate::resolver::{Declare, FileResolver};
use crate::source::FileSource;

/// Declaration scope handed to the body of [`FileResolver::group`].
///
/// Entries declared through the scope carry its group name. The scope owns
/// the resolver's group lock, so it is released however the body exits.
pub struct GroupScope<'a> {
    resolver: &'a FileResolver,
    name: String,
    _lock: MutexGuard<'a, HashSet<String>>,
}

impl<'a> GroupScope<'a> {
    pub(crate) fn new(resolver: &'a FileResolver, name: &str, lock: MutexGuard<'a, HashSet<String>>) -> Self {
        GroupScope {
            resolver,
            name: name.to_string(),
            _lock: lock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for GroupScope<'_> {
    fn drop(&mut self) {
        self.resolver.release_group_owner();
    }
}

impl Declare for GroupScope<'_> {
    fn declare(&self, source: FileSource) -> Arc<ResolutionEntry> {
        self.resolver.push(source, &self.name)
    }
}

impl std::fmt::Debug for GroupScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupScope").field("name", &self.name).finish()
    }
}
