use pkgdiff_common::LineDifference;

/// One step of an edit script, indexing into the compared sequences (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

/// Shortest edit script between two sequences, after Myers' O(ND) algorithm
///
/// The common prefix is matched up front, and a remainder with one side
/// empty is all insertions or all deletions. Otherwise the forward pass
/// records, before each edit step d, the furthest-reaching x of diagonals
/// -d..=d; the backtrack walks that trace from (n, m) to the prefix end.
/// When both predecessors reach equally far the insertion is taken, which
/// fixes a single script for any pair of inputs.
#[derive(Debug, Clone)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq> MyersDiff<'d, T> {
    pub fn new(a: &'d [T], b: &'d [T]) -> Self {
        Self { a, b }
    }

    /// Edit script in sequence order
    pub fn edits(&self) -> Vec<Edit> {
        let prefix = self
            .a
            .iter()
            .zip(self.b)
            .take_while(|(x, y)| x == y)
            .count();

        let mut edits: Vec<Edit> = (0..prefix)
            .map(|i| Edit::Equal { old: i, new: i })
            .collect();

        let (a, b) = (&self.a[prefix..], &self.b[prefix..]);
        if a.is_empty() {
            edits.extend((prefix..self.b.len()).map(|new| Edit::Insert { new }));
        } else if b.is_empty() {
            edits.extend((prefix..self.a.len()).map(|old| Edit::Delete { old }));
        } else {
            edits.extend(backtrack(a, b, &shortest_edit(a, b)).into_iter().map(
                |edit| match edit {
                    Edit::Equal { old, new } => Edit::Equal {
                        old: old + prefix,
                        new: new + prefix,
                    },
                    Edit::Delete { old } => Edit::Delete { old: old + prefix },
                    Edit::Insert { new } => Edit::Insert { new: new + prefix },
                },
            ));
        }

        edits
    }

    /// Number of insertions plus deletions in the shortest script
    pub fn distance(&self) -> usize {
        self.edits()
            .iter()
            .filter(|edit| !matches!(edit, Edit::Equal { .. }))
            .count()
    }
}

/// Forward pass; entry d holds diagonals -d..=d as they stood before step d
fn shortest_edit<T: Eq>(a: &[T], b: &[T]) -> Vec<Vec<isize>> {
    let (n, m) = (a.len() as isize, b.len() as isize);
    let offset = n + m;

    let mut v = vec![0isize; 2 * offset as usize + 2];
    let mut trace = Vec::new();

    for d in 0..=offset {
        trace.push(v[(offset - d) as usize..=(offset + d) as usize].to_vec());

        for k in (-d..=d).step_by(2) {
            let idx = (offset + k) as usize;

            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;

            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }

            v[idx] = x;

            if x >= n && y >= m {
                return trace;
            }
        }
    }

    trace
}

fn backtrack<T>(a: &[T], b: &[T], trace: &[Vec<isize>]) -> Vec<Edit> {
    let (mut x, mut y) = (a.len() as isize, b.len() as isize);
    let mut edits = Vec::new();

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;

        let (prev_x, prev_y) = if d == 0 {
            (0, 0)
        } else {
            let at = |k: isize| v[(k + d) as usize];
            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = at(prev_k);
            (prev_x, prev_x - prev_k)
        };

        while x > prev_x && y > prev_y {
            edits.push(Edit::Equal {
                old: (x - 1) as usize,
                new: (y - 1) as usize,
            });
            x -= 1;
            y -= 1;
        }

        if d > 0 {
            if x == prev_x {
                edits.push(Edit::Insert {
                    new: prev_y as usize,
                });
            } else {
                edits.push(Edit::Delete {
                    old: prev_x as usize,
                });
            }
        }

        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}

/// Lines only in `a` and lines only in `b` under the shortest edit script
pub fn line_differences(
    a: &[String],
    b: &[String],
) -> (Vec<LineDifference>, Vec<LineDifference>) {
    let mut only_in_a = Vec::new();
    let mut only_in_b = Vec::new();

    for edit in MyersDiff::new(a, b).edits() {
        match edit {
            Edit::Delete { old } => only_in_a.push(LineDifference::new(old + 1, a[old].as_str())),
            Edit::Insert { new } => only_in_b.push(LineDifference::new(new + 1, b[new].as_str())),
            Edit::Equal { .. } => {}
        }
    }

    (only_in_a, only_in_b)
}
