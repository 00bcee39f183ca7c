use crate::checker::PackageDiffChecker;
use crate::source::LocalSource;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use jwalk::WalkDir;
use pkgdiff_common::{
    AppConfig, Dialects, Direction, PackageReport, PkgDiffError, Result,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runs a package comparison for every directory of two mirrored trees
///
/// Both discovery and file reads go through the local filesystem.
pub struct PackageWalker {
    dialects: Dialects,
    custom_ignore: Option<Gitignore>,
    parallel: bool,
}

impl PackageWalker {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            dialects: config.dialects.clone(),
            custom_ignore: Self::build_custom_ignore(&config.ignore_patterns)?,
            parallel: config.parallel,
        })
    }

    fn build_custom_ignore(patterns: &[String]) -> Result<Option<Gitignore>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GitignoreBuilder::new("");
        for pattern in patterns {
            builder.add_line(None, pattern).map_err(|e| {
                PkgDiffError::Config(format!("Invalid ignore pattern '{}': {}", pattern, e))
            })?;
            debug!("Added ignore pattern: {}", pattern);
        }

        let ignore = builder
            .build()
            .map_err(|e| PkgDiffError::Config(format!("Failed to build ignore rules: {}", e)))?;
        Ok(Some(ignore))
    }

    /// Relative paths of all directories under `root`, the root itself as ""
    ///
    /// A missing root has no packages.
    pub fn discover(&self, root: &Path) -> Result<BTreeSet<PathBuf>> {
        let mut packages = BTreeSet::new();
        if !root.is_dir() {
            return Ok(packages);
        }

        for entry in WalkDir::new(root).skip_hidden(false).sort(true) {
            let entry = entry.map_err(|e| PkgDiffError::Walk(e.to_string()))?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let relative = path
                .strip_prefix(root)
                .map_err(|e| PkgDiffError::Walk(e.to_string()))?
                .to_path_buf();

            if self.should_ignore_with_parents(&relative) {
                continue;
            }
            packages.insert(relative);
        }

        Ok(packages)
    }

    /// Check whether a directory or any of its parents matches an ignore pattern
    fn should_ignore_with_parents(&self, path: &Path) -> bool {
        let Some(custom_ignore) = &self.custom_ignore else {
            return false;
        };
        if path.as_os_str().is_empty() {
            return false;
        }

        let mut current = Some(path);
        while let Some(dir) = current {
            if !dir.as_os_str().is_empty() && custom_ignore.matched(dir, true).is_ignore() {
                return true;
            }
            current = dir.parent();
        }
        false
    }

    /// Compare every package found under either root, in path order
    pub fn walk(
        &self,
        src_root: &Path,
        dst_root: &Path,
        direction: Direction,
    ) -> Result<Vec<PackageReport>> {
        let mut packages = self.discover(src_root)?;
        packages.extend(self.discover(dst_root)?);

        info!(
            "Walking {} packages under {:?} and {:?}",
            packages.len(),
            src_root,
            dst_root
        );

        let source = LocalSource::new();
        let mut reports = Vec::with_capacity(packages.len());
        for package in packages {
            let checker = PackageDiffChecker::new(
                &source,
                src_root.join(&package),
                dst_root.join(&package),
                self.dialects.clone(),
                direction,
            )?
            .with_parallelism(self.parallel);

            reports.push(PackageReport {
                differences: checker.differences()?,
                package,
            });
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgdiff_common::DiffStatus;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_discover_includes_root_and_nested() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bytes/bytes.go", "x");
        write(temp.path(), "encoding/base64/base64.go", "x");

        let walker = PackageWalker::new(&AppConfig::default()).unwrap();
        let packages: Vec<PathBuf> = walker.discover(temp.path()).unwrap().into_iter().collect();

        assert_eq!(
            packages,
            vec![
                PathBuf::new(),
                PathBuf::from("bytes"),
                PathBuf::from("encoding"),
                PathBuf::from("encoding/base64"),
            ]
        );
    }

    #[test]
    fn test_discover_missing_root() {
        let temp = TempDir::new().unwrap();
        let walker = PackageWalker::new(&AppConfig::default()).unwrap();
        assert!(walker.discover(&temp.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_discover_respects_ignore_patterns() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "strings/strings.go", "x");
        write(temp.path(), "strings/testdata/data.go", "x");
        write(temp.path(), "internal/os/os.go", "x");

        let config = AppConfig {
            ignore_patterns: vec!["testdata/".to_string(), "internal".to_string()],
            ..Default::default()
        };
        let walker = PackageWalker::new(&config).unwrap();
        let packages = walker.discover(temp.path()).unwrap();

        assert!(packages.contains(Path::new("strings")));
        assert!(!packages.contains(Path::new("strings/testdata")));
        assert!(!packages.contains(Path::new("internal")));
        assert!(!packages.contains(Path::new("internal/os")));
    }

    #[test]
    fn test_walk_reports_each_package() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(src.path(), "bytes/bytes.go", "package bytes\n");
        write(dst.path(), "bytes/bytes.gno", "package bytes\n");
        write(dst.path(), "math/abs.gno", "package math\n");

        let walker = PackageWalker::new(&AppConfig::default()).unwrap();
        let reports = walker
            .walk(src.path(), dst.path(), Direction::PrimaryToSecondary)
            .unwrap();

        let packages: Vec<&Path> = reports.iter().map(|r| r.package.as_path()).collect();
        assert_eq!(packages, vec![Path::new(""), Path::new("bytes"), Path::new("math")]);

        let bytes = &reports[1].differences;
        assert!(bytes.is_identical());

        let math = &reports[2].differences;
        assert!(!math.same_number_of_files);
        assert_eq!(math.files_differences[0].status, DiffStatus::MissingInSrc);
    }

    #[test]
    fn test_walk_reads_nested_package_files() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(src.path(), "encoding/base64/base64.go", "package base64\nfunc A() {}\n");
        write(dst.path(), "encoding/base64/base64.gno", "package base64\n");

        let walker = PackageWalker::new(&AppConfig::default()).unwrap();
        let reports = walker
            .walk(src.path(), dst.path(), Direction::PrimaryToSecondary)
            .unwrap();

        let base64 = reports
            .iter()
            .find(|r| r.package == Path::new("encoding/base64"))
            .unwrap();
        let file = &base64.differences.files_differences[0];
        assert_eq!(file.status, DiffStatus::MissingInDst);
        assert_eq!(file.src_line_diff[0].line, "func A() {}");
    }
}
