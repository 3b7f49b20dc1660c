//! Point-in-time listings of a process's open file descriptors.
//!
//! A [`Snapshot`] is an ordered list of text lines, one per descriptor. The
//! format of a line is whatever the producing [`SnapshotSource`] emits; it is
//! only ever searched for literal substrings, never parsed.
//!
//! # Sources
//!
//! - [`Lsof`] runs `lsof -p <pid>` and is the default source.
//! - [`ProcFd`] reads `/proc/<pid>/fd` directly and needs no external tool.
//! - Any `Fn() -> Result<Snapshot>` closure, mostly useful in tests.
mod error;
mod lsof;
mod procfd;
mod source;

pub use error::{Error, Result};
pub use lsof::{LSOF_PROGRAM_ENV, Lsof};
pub use procfd::ProcFd;
pub use source::SnapshotSource;

/// An immutable, ordered listing of open file descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    lines: Vec<String>,
}

impl Snapshot {
    /// Builds a snapshot from raw tool output, one descriptor per line.
    ///
    /// A trailing line ending does not produce an empty last line.
    ///
    /// # Example
    ///
    /// ```
    /// # use fdcount::snapshot::Snapshot;
    /// let snapshot = Snapshot::from_output("a:1\nb:2\n");
    /// assert_eq!(snapshot.lines(), ["a:1", "b:2"]);
    /// ```
    pub fn from_output(output: &str) -> Self {
        output.lines().collect()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of lines containing `pattern`.
    ///
    /// Matching is a case-sensitive, literal containment test per line. A
    /// line holding several occurrences still counts once, and an empty
    /// pattern matches every line.
    pub fn count_matches(&self, pattern: &str) -> usize {
        self.lines
            .iter()
            .filter(|line| line.contains(pattern))
            .count()
    }
}

impl<S: Into<String>> FromIterator<S> for Snapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<String>> for Snapshot {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}
