use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A line present in one sequence with no aligned counterpart in the other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineDifference {
    /// 1-based position in the originating sequence
    pub number: usize,
    pub line: String,
}

impl LineDifference {
    pub fn new(number: usize, line: impl Into<String>) -> Self {
        Self {
            number,
            line: line.into(),
        }
    }
}

/// Verdict for one logical file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// Destination has lines the source lacks, and nothing the other way round
    MissingInSrc,
    /// Source has lines the destination lacks, and nothing the other way round
    MissingInDst,
    /// Both sides carry lines the other does not
    HasDiff,
    /// Line sequences are identical (or both files are absent)
    NoDiff,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::MissingInSrc => "missing in src",
            DiffStatus::MissingInDst => "missing in dst",
            DiffStatus::HasDiff => "files differ",
            DiffStatus::NoDiff => "files are equal",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison result for one logical file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDifference {
    pub status: DiffStatus,
    pub source_name: String,
    pub destination_name: String,
    /// Lines found only in the source file
    pub src_line_diff: Vec<LineDifference>,
    /// Lines found only in the destination file
    pub dst_line_diff: Vec<LineDifference>,
}

impl FileDifference {
    /// Source file name with its extension removed
    pub fn logical_name<'a>(&'a self, source_extension: &str) -> &'a str {
        self.source_name
            .strip_suffix(source_extension)
            .unwrap_or(&self.source_name)
    }

    pub fn is_equal(&self) -> bool {
        self.status == DiffStatus::NoDiff
    }
}

/// Whole-package comparison result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differences {
    /// Whether both directories list the same number of raw entries
    pub same_number_of_files: bool,
    pub files_differences: Vec<FileDifference>,
}

impl Differences {
    /// True when file counts match and every file compares equal
    pub fn is_identical(&self) -> bool {
        self.same_number_of_files && self.files_differences.iter().all(FileDifference::is_equal)
    }

    pub fn count(&self, status: DiffStatus) -> usize {
        self.files_differences
            .iter()
            .filter(|file| file.status == status)
            .count()
    }
}

/// Differences for one package discovered while walking two trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReport {
    /// Package directory relative to both roots; empty for the roots themselves
    pub package: PathBuf,
    pub differences: Differences,
}
