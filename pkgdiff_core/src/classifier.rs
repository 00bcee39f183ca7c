use pkgdiff_common::{DiffStatus, LineDifference};

/// Reduce the two one-sided difference lists of a file pair to a status
///
/// Equal lists win first, so two absent files are `NoDiff`. An empty source
/// list then means the destination only adds lines, and vice versa.
pub fn classify(src_diff: &[LineDifference], dst_diff: &[LineDifference]) -> DiffStatus {
    if src_diff == dst_diff {
        DiffStatus::NoDiff
    } else if src_diff.is_empty() {
        DiffStatus::MissingInSrc
    } else if dst_diff.is_empty() {
        DiffStatus::MissingInDst
    } else {
        DiffStatus::HasDiff
    }
}
