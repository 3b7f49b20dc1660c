use super::{Result, Snapshot};

/// Something that can list the open file descriptors of a process.
///
/// Each call to [`capture`](SnapshotSource::capture) takes a fresh snapshot;
/// implementations keep no state between calls and never retry.
pub trait SnapshotSource {
    fn capture(&self) -> Result<Snapshot>;
}

impl<F> SnapshotSource for F
where
    F: Fn() -> Result<Snapshot>,
{
    fn capture(&self) -> Result<Snapshot> {
        self()
    }
}
