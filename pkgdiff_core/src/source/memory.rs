use pkgdiff_common::{split_lines, PackageSource, SourceError};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
enum MemoryEntry {
    Text(String),
    Unreadable,
}

/// In-memory package source
///
/// Directories exist implicitly as parents of inserted files. Paths are
/// compared component-wise, so `a/./b.go` and `a/b.go` name the same file.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, MemoryEntry>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add a file whose reads fail with a permission error
    pub fn with_unreadable(mut self, path: impl AsRef<Path>) -> Self {
        self.files
            .insert(normalize(path.as_ref()), MemoryEntry::Unreadable);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(
            normalize(path.as_ref()),
            MemoryEntry::Text(contents.into()),
        );
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl PackageSource for MemorySource {
    fn list_names(&self, dir: &Path) -> Result<Vec<String>, SourceError> {
        let dir = normalize(dir);
        if self.files.contains_key(&dir) {
            return Err(SourceError::NotADirectory(dir.display().to_string()));
        }

        let names: BTreeSet<String> = self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(&dir).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().to_string())
            .collect();

        Ok(names.into_iter().collect())
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        match self.files.get(&normalize(path)) {
            Some(MemoryEntry::Text(text)) => Ok(split_lines(text)),
            Some(MemoryEntry::Unreadable) => Err(SourceError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ))),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_names_direct_children() {
        let source = MemorySource::new()
            .with_file("src/a.go", "a")
            .with_file("src/b.go", "b")
            .with_file("src/sub/c.go", "c")
            .with_file("other/d.go", "d");

        let names = source.list_names(Path::new("src")).unwrap();
        assert_eq!(names, vec!["a.go", "b.go", "sub"]);
    }

    #[test]
    fn test_missing_paths_are_empty() {
        let source = MemorySource::new().with_file("src/a.go", "a");
        assert!(source.list_names(Path::new("dst")).unwrap().is_empty());
        assert!(source.read_lines(Path::new("dst/a.gno")).unwrap().is_empty());
    }

    #[test]
    fn test_read_lines_normalizes_path() {
        let source = MemorySource::new().with_file("src/a.go", "one\ntwo\n");
        let lines = source.read_lines(Path::new("./src/./a.go")).unwrap();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_unreadable_file() {
        let source = MemorySource::new().with_unreadable("src/a.go");
        assert!(source.read_lines(Path::new("src/a.go")).is_err());
        assert_eq!(source.list_names(Path::new("src")).unwrap(), vec!["a.go"]);
    }

    #[test]
    fn test_list_file_is_an_error() {
        let source = MemorySource::new().with_file("src/a.go", "a");
        let err = source.list_names(Path::new("src/a.go")).unwrap_err();
        assert!(matches!(err, SourceError::NotADirectory(_)));
    }
}
