//! File name derivation for downloaded sources.
//!
//! The destination file keeps the last segment of the source URL, sanitized so
//! it is a single, safe path component that never starts with a dot.

mod sanitize;

pub use sanitize::sanitize_filename;

/// Used when the URL yields no usable last segment.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Last path segment of `url`, query and fragment removed.
///
/// Parseable URLs use their path; anything else is treated like a path string
/// and split on `/` and `\`.
pub fn last_segment(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme().len() > 1 => parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
        _ => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end]
                .split(['/', '\\'])
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string)
        }
    }?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment)
}

/// Derives the local file name for a download of `url`.
///
/// # Examples
///
/// - `derive_filename("https://example.test/pkg.zip")` → `"pkg.zip"`
/// - `derive_filename("smb://nas/share/")` → `"share"`
/// - `derive_filename("https://example.test/")` → `"download.bin"`
pub fn derive_filename(url: &str) -> String {
    last_segment(url)
        .and_then(|s| sanitize_filename(&s))
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
