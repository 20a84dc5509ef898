//! Generic URL variant (`file://`, `ftp://`, ...): anything with a real scheme.

/// True when `url` parses as an absolute URL with a scheme longer than one
/// character. Single-letter schemes are Windows drive letters (`C:\...`).
pub fn handles(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.scheme().len() > 1,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_schemes_but_not_paths() {
        assert!(handles("file:///tmp/pkg.zip"));
        assert!(handles("ftp://mirror/pkg.zip"));
        assert!(!handles("/local/f"));
        assert!(!handles("relative/dir/f.zip"));
        assert!(!handles("C:\\packages\\f.zip"));
    }
}
