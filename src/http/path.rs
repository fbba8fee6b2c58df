//! Request path helpers used by the dispatcher.

/// Whether `path` contains a sequence the server refuses to serve.
///
/// Rejected: an empty path or one not starting with `/`, any `..` segment
/// (plain or percent-encoded), backslashes, NUL (plain or encoded) and ASCII
/// control characters.
pub fn has_illegal_characters(path: &str) -> bool {
    if !path.starts_with('/') {
        return true;
    }

    if path.chars().any(|c| c.is_control() || c == '\\') {
        return true;
    }

    let lowered = path.to_ascii_lowercase();
    if lowered.contains("%00") || lowered.contains("%5c") {
        return true;
    }

    lowered
        .replace("%2e", ".")
        .replace("%2f", "/")
        .split('/')
        .any(|segment| segment == "..")
}

/// Whether `path` already denotes a directory (ends in `/`).
pub fn is_directory_path(path: &str) -> bool {
    path.ends_with('/')
}

/// `path` in directory form, with exactly one trailing `/`.
pub fn normalized_directory_path(path: &str) -> String {
    if is_directory_path(path) {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
