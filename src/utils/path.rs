//! Path helpers for scratch and playlist handling

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and resolve `.` and
/// `..` lexically, without touching the filesystem.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}

/// Quote a path for a concat-demuxer `file` directive.
///
/// The demuxer reads single-quoted strings; an embedded quote is closed,
/// escaped and reopened (`'\''`).
pub fn quote_concat_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}

/// Whether `inner` lies at or below `outer` (both made absolute first)
pub fn is_within(inner: &Path, outer: &Path) -> io::Result<bool> {
    let inner = absolutize(inner)?;
    let outer = absolutize(outer)?;
    Ok(inner.starts_with(outer))
}
