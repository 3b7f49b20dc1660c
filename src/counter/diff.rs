//! Set-difference reports between two snapshots.
//!
//! Both sides are collapsed to sets of distinct lines before comparing, so a
//! line that appears twice in one snapshot and once in the other is not
//! reported.

use std::collections::BTreeSet;
use std::fmt;

use crate::snapshot::Snapshot;

const SEPARATOR: &str = "-----------------------------";

/// Lines added and removed between a starting and an ending snapshot.
///
/// Both groups are sorted. The [`Display`](fmt::Display) form always renders
/// both sections, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl DiffReport {
    pub fn between(start: &Snapshot, end: &Snapshot) -> Self {
        let start: BTreeSet<&str> = start.lines().iter().map(String::as_str).collect();
        let end: BTreeSet<&str> = end.lines().iter().map(String::as_str).collect();

        Self {
            added: end.difference(&start).map(|&line| line.to_owned()).collect(),
            removed: start.difference(&end).map(|&line| line.to_owned()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "New file descriptors\n{SEPARATOR}\n{}\n\nRemoved file descriptors\n{SEPARATOR}\n{}\n",
            self.added.join("\n"),
            self.removed.join("\n"),
        )
    }
}

/// Renders the added/removed report between two snapshots.
///
/// # Example
///
/// ```
/// # use fdcount::counter::render_diff;
/// # use fdcount::snapshot::Snapshot;
/// let start = Snapshot::from_output("a:1\nb:2\n");
/// let end = Snapshot::from_output("a:1\na:3\n");
/// let report = render_diff(&start, &end);
/// assert!(report.starts_with("New file descriptors\n"));
/// assert!(report.contains("a:3"));
/// ```
pub fn render_diff(start: &Snapshot, end: &Snapshot) -> String {
    DiffReport::between(start, end).to_string()
}
