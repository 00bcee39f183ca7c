use crate::classifier::classify;
use crate::file_diff::FileDiff;
use pkgdiff_common::{
    Dialects, Differences, Direction, ExtensionPair, FileDifference, PackageSource, PkgDiffError,
    Result,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Compares the files of two directories written in mirrored dialects
///
/// Files are joined on their logical name (the name without its dialect
/// extension). Content is read per pair and dropped after each comparison.
pub struct PackageDiffChecker<'s> {
    source: &'s dyn PackageSource,
    src_files: Vec<String>,
    src_path: PathBuf,
    dst_files: Vec<String>,
    dst_path: PathBuf,
    dialects: Dialects,
    extensions: ExtensionPair,
    parallel: bool,
}

impl<'s> PackageDiffChecker<'s> {
    /// List both directories and resolve the extension pair for `direction`
    pub fn new(
        source: &'s dyn PackageSource,
        src_path: impl Into<PathBuf>,
        dst_path: impl Into<PathBuf>,
        dialects: Dialects,
        direction: Direction,
    ) -> Result<Self> {
        let src_path = src_path.into();
        let dst_path = dst_path.into();

        let src_files = source
            .list_names(&src_path)
            .map_err(|e| PkgDiffError::source_at(&src_path, e))?;
        let dst_files = source
            .list_names(&dst_path)
            .map_err(|e| PkgDiffError::source_at(&dst_path, e))?;

        debug!(
            "Listed {} entries in {:?} and {} entries in {:?}",
            src_files.len(),
            src_path,
            dst_files.len(),
            dst_path
        );

        let extensions = dialects.extensions(direction);

        Ok(Self {
            source,
            src_files,
            src_path,
            dst_files,
            dst_path,
            dialects,
            extensions,
            parallel: false,
        })
    }

    /// Compare file pairs on the rayon pool; output order is unchanged
    pub fn with_parallelism(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn extensions(&self) -> &ExtensionPair {
        &self.extensions
    }

    /// Compare every logical file found on either side
    pub fn differences(&self) -> Result<Differences> {
        let names = self.list_all_possible_files();

        let files_differences = if self.parallel {
            names
                .par_iter()
                .map(|name| self.compare_file(name))
                .collect::<Result<Vec<_>>>()?
        } else {
            names
                .iter()
                .map(|name| self.compare_file(name))
                .collect::<Result<Vec<_>>>()?
        };

        let differences = Differences {
            same_number_of_files: self.has_same_number_of_files(),
            files_differences,
        };

        info!(
            "Compared {} files between {:?} and {:?}",
            differences.files_differences.len(),
            self.src_path,
            self.dst_path
        );

        Ok(differences)
    }

    /// Unique logical names in first-seen order, source listing first
    pub fn list_all_possible_files(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for file in self.src_files.iter().chain(self.dst_files.iter()) {
            let name = self.dialects.strip(file);
            if name.is_empty() {
                continue;
            }
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }

        names
    }

    pub fn has_same_number_of_files(&self) -> bool {
        self.src_files.len() == self.dst_files.len()
    }

    fn compare_file(&self, name: &str) -> Result<FileDifference> {
        let source_name = format!("{}{}", name, self.extensions.source);
        let destination_name = format!("{}{}", name, self.extensions.destination);

        let file_diff = FileDiff::new(
            self.source,
            &self.src_path.join(&source_name),
            &self.dst_path.join(&destination_name),
        )?;
        let (src_line_diff, dst_line_diff) = file_diff.differences();
        let status = classify(&src_line_diff, &dst_line_diff);

        debug!("{} vs {}: {}", source_name, destination_name, status);

        Ok(FileDifference {
            status,
            source_name,
            destination_name,
            src_line_diff,
            dst_line_diff,
        })
    }
}
