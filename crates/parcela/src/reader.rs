//! Source readers used by the asset builder
//!
//! The bundler never touches the filesystem directly; it goes through a
//! [`SourceReader`] so the whole pipeline can run against in-memory sources.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;

use crate::resolver::normalize_path;

/// Reads the full UTF-8 text of a source file
pub trait SourceReader {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads sources from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Serves sources from memory, keyed by normalized path
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a file
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), source.into());
    }
}

impl SourceReader for MemoryReader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file: {}", path.display()),
                )
            })
    }
}

impl<R: SourceReader + ?Sized> SourceReader for &R {
    fn read(&self, path: &Path) -> io::Result<String> {
        (**self).read(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reader_normalizes_keys() {
        let reader = MemoryReader::new().with_file("./src/a.js", "export default 1;");
        assert_eq!(
            reader.read(Path::new("src/lib/../a.js")).unwrap(),
            "export default 1;"
        );
    }

    #[test]
    fn test_memory_reader_missing_file() {
        let err = MemoryReader::new().read(Path::new("missing.js")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_fs_reader_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "console.log(1);").unwrap();
        assert_eq!(FsReader.read(&file).unwrap(), "console.log(1);");
        assert!(FsReader.read(&dir.path().join("nope.js")).is_err());
    }
}
