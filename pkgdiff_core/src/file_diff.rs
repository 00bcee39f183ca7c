use crate::myers::line_differences;
use pkgdiff_common::{LineDifference, PackageSource, PkgDiffError, Result};
use std::path::Path;

/// Line contents of a source/destination file pair
///
/// A missing file reads as no lines, so two missing files compare equal.
#[derive(Debug, Clone)]
pub struct FileDiff {
    src: Vec<String>,
    dst: Vec<String>,
}

impl FileDiff {
    pub fn new(
        source: &dyn PackageSource,
        src_path: &Path,
        dst_path: &Path,
    ) -> Result<Self> {
        let src = source
            .read_lines(src_path)
            .map_err(|e| PkgDiffError::source_at(src_path, e))?;
        let dst = source
            .read_lines(dst_path)
            .map_err(|e| PkgDiffError::source_at(dst_path, e))?;

        Ok(Self { src, dst })
    }

    /// Lines only in the source file and lines only in the destination file
    pub fn differences(&self) -> (Vec<LineDifference>, Vec<LineDifference>) {
        line_differences(&self.src, &self.dst)
    }
}
