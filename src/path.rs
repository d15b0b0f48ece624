//! Path manipulation utilities for amalgamate

use std::path::Path;

/// Derive the graph key of a file: its base filename.
///
/// Falls back to the full display form for paths without a final component
/// (`/`, `..`), which never name a readable source unit anyway.
pub fn unit_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Derive the key an include target refers to.
///
/// Include targets are written with forward slashes on every platform, so
/// the basename is taken after the last `/` or `\`.
pub fn target_key(target: &str) -> &str {
    target.rsplit(['/', '\\']).next().unwrap_or(target)
}

/// Render a relative path with forward slashes, the form include
/// directives use.
pub fn to_include_form(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `pattern` contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
