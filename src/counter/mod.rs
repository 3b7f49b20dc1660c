//! Filtered descriptor counting and delta assertions.
//!
//! A [`Counter`] freezes a starting snapshot together with its filtered count.
//! Later calls take fresh snapshots from the same source and compare against
//! that starting point; nothing about the fresh snapshots is stored.
mod diff;

pub use diff::{DiffReport, render_diff};

use crate::error::{DeltaMismatch, Result};
use crate::snapshot::{Lsof, Snapshot, SnapshotSource};

/// Tracks how many descriptor lines matching a literal substring come and go.
#[derive(Debug)]
pub struct Counter<S = Lsof> {
    source: S,
    pattern: String,
    starting_snapshot: Snapshot,
    starting_count: usize,
}

impl Counter<Lsof> {
    /// Counts the current process's descriptor lines containing `pattern`
    /// using `lsof`, returning the count and a counter anchored at it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalTool`](crate::Error::ExternalTool) if `lsof`
    /// cannot be run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use fdcount::Counter;
    /// let (initial, counter) = Counter::matching("TCP")?;
    /// let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    /// counter.assert_delta(1)?;
    /// drop(listener);
    /// counter.assert_delta(0)?;
    /// # let _ = initial;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn matching(pattern: impl Into<String>) -> Result<(usize, Self)> {
        Self::matching_with(Lsof::new(), pattern)
    }
}

impl<S: SnapshotSource> Counter<S> {
    /// Like [`Counter::matching`], but captures from `source`.
    pub fn matching_with(source: S, pattern: impl Into<String>) -> Result<(usize, Self)> {
        let pattern = pattern.into();
        let starting_snapshot = source.capture()?;
        let starting_count = starting_snapshot.count_matches(&pattern);
        log::trace!(
            "Starting count for `{}`: {} of {} lines",
            pattern,
            starting_count,
            starting_snapshot.len()
        );

        let counter = Self {
            source,
            pattern,
            starting_snapshot,
            starting_count,
        };
        Ok((starting_count, counter))
    }

    /// Returns the signed change in matching lines since the counter was
    /// created, without asserting anything.
    pub fn delta(&self) -> Result<i64> {
        let (_, actual) = self.capture_delta()?;
        Ok(actual)
    }

    /// Checks that the number of matching lines changed by exactly
    /// `expected` since the counter was created.
    ///
    /// # Errors
    ///
    /// - [`Error::ExternalTool`](crate::Error::ExternalTool) if the fresh
    ///   snapshot cannot be captured.
    /// - [`Error::DeltaMismatch`](crate::Error::DeltaMismatch) if the delta
    ///   differs, with a report of added and removed lines.
    pub fn assert_delta(&self, expected: i64) -> Result<()> {
        let (snapshot, actual) = self.capture_delta()?;
        if actual == expected {
            return Ok(());
        }

        log::warn!(
            "Unexpected delta for `{}`: expected {}, have {}",
            self.pattern,
            expected,
            actual
        );
        Err(DeltaMismatch {
            expected,
            actual,
            report: DiffReport::between(&self.starting_snapshot, &snapshot),
        }
        .into())
    }

    pub fn starting_count(&self) -> usize {
        self.starting_count
    }

    pub fn starting_snapshot(&self) -> &Snapshot {
        &self.starting_snapshot
    }

    pub fn match_str(&self) -> &str {
        &self.pattern
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn capture_delta(&self) -> Result<(Snapshot, i64)> {
        let snapshot = self.source.capture()?;
        let count = snapshot.count_matches(&self.pattern);
        log::trace!("Current count for `{}`: {}", self.pattern, count);
        let delta = count as i64 - self.starting_count as i64;
        Ok((snapshot, delta))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::Error;
    use crate::snapshot;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Source replaying a fixed sequence of capture results.
    #[derive(Debug)]
    struct Scripted(RefCell<VecDeque<snapshot::Result<Snapshot>>>);

    impl Scripted {
        fn new(results: impl IntoIterator<Item = snapshot::Result<Snapshot>>) -> Self {
            Self(RefCell::new(results.into_iter().collect()))
        }

        fn lines(captures: &[&[&str]]) -> Self {
            Self::new(
                captures
                    .iter()
                    .map(|lines| Ok(lines.iter().copied().collect())),
            )
        }
    }

    impl SnapshotSource for Scripted {
        fn capture(&self) -> snapshot::Result<Snapshot> {
            self.0
                .borrow_mut()
                .pop_front()
                .expect("scripted source exhausted")
        }
    }

    fn spawn_failure() -> snapshot::Error {
        snapshot::Error::Spawn {
            program: "lsof".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }

    #[test]
    fn test_matching_counts_initial_lines() {
        init_logger();
        let source = Scripted::lines(&[&["a:1", "b:2", "a:3"]]);
        let (count, counter) = Counter::matching_with(source, "a").unwrap();
        assert_eq!(count, 2);
        assert_eq!(counter.starting_count(), 2);
        assert_eq!(counter.match_str(), "a");
        assert_eq!(counter.starting_snapshot().len(), 3);
    }

    #[test]
    fn test_matching_empty_pattern_counts_everything() {
        let source = Scripted::lines(&[&["a:1", "b:2", "c:3"]]);
        let (count, _) = Counter::matching_with(source, "").unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_matching_is_idempotent_on_stable_source() {
        let stable =
            || -> snapshot::Result<Snapshot> { Ok(Snapshot::from_output("a:1\nb:2\n")) };
        let (first, _) = Counter::matching_with(stable, "a").unwrap();
        let (second, _) = Counter::matching_with(stable, "a").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_matching_capture_failure() {
        let source = Scripted::new([Err(spawn_failure())]);
        let err = Counter::matching_with(source, "a").unwrap_err();
        assert!(matches!(err, Error::ExternalTool(snapshot::Error::Spawn { .. })));
        assert!(!err.is_mismatch());
    }

    #[test]
    fn test_assert_delta_no_change() {
        let source = Scripted::lines(&[&["a:1", "b:2"], &["a:1", "b:2"]]);
        let (_, counter) = Counter::matching_with(source, "a").unwrap();
        counter.assert_delta(0).unwrap();
    }

    #[test]
    fn test_assert_delta_added_and_removed() {
        // two matching lines appear, one disappears
        let source = Scripted::lines(&[
            &["a:1", "a:2", "b:1"],
            &["a:2", "a:3", "a:4", "b:1", "b:2"],
        ]);
        let (_, counter) = Counter::matching_with(source, "a").unwrap();
        counter.assert_delta(2 - 1).unwrap();
    }

    #[test]
    fn test_assert_delta_negative() {
        let source = Scripted::lines(&[&["a:1", "a:2"], &[]]);
        let (_, counter) = Counter::matching_with(source, "a").unwrap();
        counter.assert_delta(-2).unwrap();
    }

    #[test]
    fn test_assert_delta_mismatch() {
        init_logger();
        let source = Scripted::lines(&[&["a:1", "b:2"], &["a:1", "a:3", "b:2"]]);
        let (count, counter) = Counter::matching_with(source, "a").unwrap();
        assert_eq!(count, 1);

        let err = counter.assert_delta(0).unwrap_err();
        let mismatch = err.as_mismatch().expect("expected a delta mismatch");
        assert_eq!(mismatch.expected, 0);
        assert_eq!(mismatch.actual, 1);
        assert_eq!(mismatch.report.added, ["a:3"]);
        assert!(mismatch.report.removed.is_empty());

        let message = err.to_string();
        assert!(message.starts_with("unexpected file descriptor count: expected 0, have 1"));
        assert!(message.contains("New file descriptors"));
        assert!(message.contains("Removed file descriptors"));
    }

    #[test]
    fn test_assert_delta_mismatch_reports_unmatched_lines_too() {
        let source = Scripted::lines(&[&["a:1"], &["a:1", "b:9"]]);
        let (_, counter) = Counter::matching_with(source, "a").unwrap();
        let err = counter.assert_delta(1).unwrap_err();
        let mismatch = err.as_mismatch().unwrap();
        assert_eq!(mismatch.actual, 0);
        assert_eq!(mismatch.report.added, ["b:9"]);
    }

    #[test]
    fn test_assert_delta_capture_failure_is_not_mismatch() {
        let source = Scripted::new([
            Ok(Snapshot::from_output("a:1\n")),
            Err(spawn_failure()),
        ]);
        let (_, counter) = Counter::matching_with(source, "a").unwrap();
        let err = counter.assert_delta(5).unwrap_err();
        assert!(matches!(err, Error::ExternalTool(_)));
        assert!(err.as_mismatch().is_none());
    }

    #[test]
    fn test_delta_reports_without_asserting() {
        let source = Scripted::lines(&[&["a:1"], &["a:1", "a:2", "a:3"]]);
        let (_, counter) = Counter::matching_with(source, "a").unwrap();
        assert_eq!(counter.delta().unwrap(), 2);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_procfd_counter_tracks_open_file() {
        init_logger();
        let (_, counter) =
            Counter::matching_with(snapshot::ProcFd::new(), "fdcount-probe").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fdcount-probe");
        let file = std::fs::File::create(&path).unwrap();
        counter.assert_delta(1).unwrap();

        drop(file);
        counter.assert_delta(0).unwrap();
    }
}
