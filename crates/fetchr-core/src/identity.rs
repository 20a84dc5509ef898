//! Content-derived identities for declared sources.
//!
//! An identity is the lowercase hex SHA-256 of a canonical encoding of the
//! source's inputs. Every field is written with a tag and a length
//! prefix, so `("ab", "c")` and `("a", "bc")` never collide and an absent
//! value encodes differently from an empty one.

use sha2::{Digest, Sha256};

/// Incremental builder for an identity hash.
pub struct IdentityHasher {
    hasher: Sha256,
}

impl IdentityHasher {
    /// Starts a new identity for a source of the given kind
    /// (e.g. `"local"`, `"sftp-auth"`).
    pub fn new(kind: &str) -> Self {
        let mut h = IdentityHasher {
            hasher: Sha256::new(),
        };
        h.str(kind);
        h
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        self.bytes(value.as_bytes())
    }

    /// Raw bytes, for inputs that need not be UTF-8 (local paths).
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.hasher.update([b's']);
        self.hasher.update((value.len() as u64).to_le_bytes());
        self.hasher.update(value);
        self
    }

    pub fn opt_str(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.str(v),
            None => {
                self.hasher.update([b'n']);
                self
            }
        }
    }

    pub fn opt_bool(&mut self, value: Option<bool>) -> &mut Self {
        let tag = match value {
            Some(true) => b'T',
            Some(false) => b'F',
            None => b'n',
        };
        self.hasher.update([tag]);
        self
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// Combined hash over identities, in order. Changes if and only if the
/// sequence of identities changes.
pub fn fingerprint<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut h = IdentityHasher::new("fingerprint");
    for id in ids {
        h.str(id);
    }
    h.finish()
}
