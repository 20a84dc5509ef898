//! Declarative file resolution and caching.
//!
//! Callers declare files (local paths, SFTP/SMB/HTTP/other URLs) on a
//! [`FileResolver`]; each declaration gets a content-derived identity and its
//! own directory under the download root. Remote files are fetched on first
//! read, at most once per entry, and a completion marker lets later runs reuse
//! them.

pub mod cache;
pub mod config;
pub mod credentials;
pub mod download;
pub mod entry;
pub mod error;
pub mod group;
pub mod identity;
pub mod logging;
pub mod lookup;
pub mod marker;
pub mod resolver;
pub mod source;
pub mod url_model;

pub use credentials::{HttpAuth, SftpAuth, SmbAuth};
pub use entry::{ResolutionEntry, ResolveState};
pub use error::ResolveError;
pub use group::GroupScope;
pub use resolver::{all_groups, Declare, FileResolver, GROUP_DEFAULT};
pub use source::{FileSource, RemoteVia};
