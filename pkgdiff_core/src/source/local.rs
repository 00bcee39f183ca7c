use pkgdiff_common::{split_lines, PackageSource, SourceError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Local filesystem package source
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSource;

impl LocalSource {
    pub fn new() -> Self {
        Self
    }
}

impl PackageSource for LocalSource {
    fn list_names(&self, dir: &Path) -> Result<Vec<String>, SourceError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Directory {:?} does not exist, treating as empty", dir);
                return Ok(Vec::new());
            }
            Err(e) => {
                if dir.exists() && !dir.is_dir() {
                    return Err(SourceError::NotADirectory(dir.display().to_string()));
                }
                return Err(SourceError::Io(e));
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().into_string().map_err(|raw| {
                SourceError::InvalidEncoding(format!("file name {:?}", raw))
            })?;
            names.push(name);
        }
        names.sort();

        Ok(names)
    }

    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File {:?} does not exist, treating as empty", path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(SourceError::Io(e)),
        };

        let text = String::from_utf8(bytes)
            .map_err(|e| SourceError::InvalidEncoding(format!("{}: {}", path.display(), e)))?;
        Ok(split_lines(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_names_sorted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.go"), "b").unwrap();
        fs::write(temp.path().join("a.go"), "a").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let names = LocalSource::new().list_names(temp.path()).unwrap();
        assert_eq!(names, vec!["a.go", "b.go", "sub"]);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let names = LocalSource::new()
            .list_names(&temp.path().join("missing"))
            .unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_list_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.go");
        fs::write(&file, "x").unwrap();

        let err = LocalSource::new().list_names(&file).unwrap_err();
        assert!(matches!(err, SourceError::NotADirectory(_)));
    }

    #[test]
    fn test_read_lines() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.go");
        fs::write(&file, "package a\r\n\nfunc A() {}\n").unwrap();

        let lines = LocalSource::new().read_lines(&file).unwrap();
        assert_eq!(lines, vec!["package a", "", "func A() {}"]);
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let lines = LocalSource::new()
            .read_lines(&temp.path().join("missing.gno"))
            .unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_read_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("bin.go");
        fs::write(&file, b"\xff\xfe\x00").unwrap();

        let err = LocalSource::new().read_lines(&file).unwrap_err();
        assert!(matches!(err, SourceError::InvalidEncoding(_)));
    }

    #[test]
    fn test_read_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = LocalSource::new().read_lines(temp.path()).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_unreadable_directory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("locked");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.go"), "a").unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users bypass mode bits
        if fs::read_dir(&dir).is_ok() {
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = LocalSource::new().list_names(&dir);
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(SourceError::Io(e)) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
