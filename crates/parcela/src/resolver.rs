//! Relative specifier resolution
//!
//! Specifiers are always resolved against the directory of the importing file
//! with POSIX join semantics: the specifier is appended segment by segment and
//! the result is normalized lexically. The filesystem is never consulted, so a
//! resolved path may point at a file that does not exist; the asset builder
//! reports that when it tries to read it.

use std::path::{Component, Path, PathBuf};

/// Directory component of a file path, `.` for bare file names
pub fn dirname(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None if path.has_root() => path.to_path_buf(),
        None => PathBuf::from("."),
    }
}

/// Resolve `specifier` as written in `importer` to a normalized path
///
/// ```
/// use std::path::{Path, PathBuf};
/// use parcela::resolver::resolve_specifier;
///
/// let resolved = resolve_specifier(Path::new("example/entry.js"), "./message.js");
/// assert_eq!(resolved, PathBuf::from("example/message.js"));
/// ```
pub fn resolve_specifier(importer: &Path, specifier: &str) -> PathBuf {
    let mut joined = dirname(importer);
    // POSIX join: a leading slash in the specifier does not reset the base
    for segment in specifier.split('/').filter(|segment| !segment.is_empty()) {
        joined.push(segment);
    }
    normalize_path(&joined)
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding normal segment where there is one
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_dirname() {
        assert_eq!(dirname(Path::new("entry.js")), PathBuf::from("."));
        assert_eq!(dirname(Path::new("src/entry.js")), PathBuf::from("src"));
        assert_eq!(dirname(Path::new("/abs/src/a.js")), PathBuf::from("/abs/src"));
        assert_eq!(dirname(Path::new("/")), PathBuf::from("/"));
    }

    #[test]
    fn test_resolve_relative_to_importer_directory() {
        assert_eq!(
            resolve_specifier(Path::new("entry.js"), "./b.js"),
            PathBuf::from("b.js")
        );
        assert_eq!(
            resolve_specifier(Path::new("src/app/main.js"), "../lib/util.js"),
            PathBuf::from("src/lib/util.js")
        );
        assert_eq!(
            resolve_specifier(Path::new("/project/src/main.js"), "./nested/./x.js"),
            PathBuf::from("/project/src/nested/x.js")
        );
    }

    #[test]
    fn test_resolve_keeps_leading_parent_segments() {
        assert_eq!(
            resolve_specifier(Path::new("a.js"), "../../up.js"),
            PathBuf::from("../../up.js")
        );
        assert_eq!(
            resolve_specifier(Path::new("/a.js"), "../../up.js"),
            PathBuf::from("/up.js")
        );
    }

    #[test]
    fn test_resolve_joins_absolute_specifier() {
        assert_eq!(
            resolve_specifier(Path::new("src/main.js"), "/lib/x.js"),
            PathBuf::from("src/lib/x.js")
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("./a/b/../c.js")), PathBuf::from("a/c.js"));
        assert_eq!(normalize_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    }
}
