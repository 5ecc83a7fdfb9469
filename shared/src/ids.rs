//! Helpers for validating resource names used as runtime file names.

/// Returns true if a resource name is safe to use as a single file name,
/// both as a URL path segment and as a runtime filesystem entry.
///
/// Rules:
/// - Must be non-empty and not "." or ".."
/// - Must not contain path separators ('/' or '\\')
/// - Must not contain control characters or NUL
/// - Must not contain URL query/fragment delimiters ('?' or '#')
/// - Must not end with '.' or space
pub fn is_safe_resource_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }

    if name.ends_with('.') || name.ends_with(' ') {
        return false;
    }

    name.chars()
        .all(|c| !matches!(c, '/' | '\\' | '\0' | '?' | '#') && !c.is_control())
}
