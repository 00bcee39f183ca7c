use crate::SourceError;
use std::path::Path;

/// Read access to the two trees being reconciled
///
/// Implementations treat absence as emptiness: a missing directory lists no
/// names and a missing file reads as no lines. Every other failure is
/// reported as a `SourceError` and aborts the comparison.
pub trait PackageSource: Send + Sync {
    /// Lists the entry names of a directory, in a stable order
    fn list_names(&self, dir: &Path) -> Result<Vec<String>, SourceError>;

    /// Reads a file as an ordered sequence of lines
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, SourceError>;
}

/// Split text into lines, accepting `\n` and `\r\n` terminators
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
