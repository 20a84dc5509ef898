//! Single path component sanitization.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Turns `name` into a safe single path component.
///
/// - NUL, `/`, `\`, whitespace and control characters become `_` (runs collapse)
/// - leading/trailing dots, spaces and underscores are trimmed, so the result
///   never starts with `.`
/// - truncated to 255 bytes on a char boundary
///
/// Returns `None` when nothing usable remains.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let c = if c == '\0' || c == '/' || c == '\\' || c.is_whitespace() || c.is_control() {
            '_'
        } else {
            c
        };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut take = trimmed.len().min(NAME_MAX);
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    let result = &trimmed[..take];
    if result.is_empty() {
        None
    } else {
        Some(result.to_string())
    }
}
