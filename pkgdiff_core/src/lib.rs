pub mod source;
pub mod myers;
pub mod file_diff;
pub mod classifier;
pub mod checker;
pub mod walker;

pub use source::{LocalSource, MemorySource};
pub use myers::{line_differences, Edit, MyersDiff};
pub use file_diff::FileDiff;
pub use classifier::classify;
pub use checker::PackageDiffChecker;
pub use walker::PackageWalker;
