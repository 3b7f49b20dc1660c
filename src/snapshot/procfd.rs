use std::path::{Path, PathBuf};

use crate::fsutil;

use super::{Error, Result, Snapshot, SnapshotSource};

/// Snapshots open file descriptors by reading `/proc/<pid>/fd`.
///
/// Each descriptor becomes one line of the form `<fd> -> <target>`, sorted by
/// descriptor number. Requires a mounted procfs (Linux).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcFd {
    fd_dir: PathBuf,
}

impl ProcFd {
    /// Creates a source listing the current process.
    pub fn new() -> Self {
        Self::with_pid(std::process::id())
    }

    pub fn with_pid(pid: u32) -> Self {
        Self {
            fd_dir: PathBuf::from(format!("/proc/{pid}/fd")),
        }
    }

    pub fn fd_dir(&self) -> &Path {
        &self.fd_dir
    }
}

impl Default for ProcFd {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for ProcFd {
    /// Lists the fd directory and resolves every entry's link target.
    ///
    /// Entries closed between listing and resolving are skipped; this
    /// includes the descriptor used to read the directory itself.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadDir`] if the fd directory cannot be listed.
    /// - [`Error::ReadLink`] if an entry's target cannot be read.
    fn capture(&self) -> Result<Snapshot> {
        log::debug!("Capturing file descriptors from {}", self.fd_dir.display());

        let mut entries = fsutil::list_dir(&self.fd_dir)?;
        entries.sort_by_key(|path| fd_number(path));

        let mut lines = Vec::with_capacity(entries.len());
        for path in entries {
            let target = match std::fs::read_link(&path) {
                Ok(target) => target,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    log::trace!("{} closed while capturing", path.display());
                    continue;
                }
                Err(source) => return Err(Error::ReadLink { path, source }),
            };
            let fd = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            lines.push(format!("{} -> {}", fd, target.display()));
        }

        log::debug!("{} lists {} lines", self.fd_dir.display(), lines.len());
        Ok(Snapshot::from(lines))
    }
}

fn fd_number(path: &Path) -> Option<u64> {
    path.file_name()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fd_number() {
        assert_eq!(fd_number(Path::new("/proc/1/fd/17")), Some(17));
        assert_eq!(fd_number(Path::new("/proc/1/fd/x")), None);
    }

    #[test]
    fn test_with_pid_path() {
        assert_eq!(ProcFd::with_pid(42).fd_dir(), Path::new("/proc/42/fd"));
    }

    #[test]
    fn test_capture_missing_process() {
        let source = ProcFd {
            fd_dir: PathBuf::from("/definitely/does/not/exist/fd"),
        };
        let err = source.capture().unwrap_err();
        match err {
            Error::ReadDir(err) => {
                assert_eq!(err.path, PathBuf::from("/definitely/does/not/exist/fd"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_capture_sees_open_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let name = tmp
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        let snapshot = ProcFd::new().capture().unwrap();
        assert_eq!(snapshot.count_matches(&name), 1);
        assert!(snapshot.lines().iter().all(|line| line.contains(" -> ")));

        drop(tmp);
        let snapshot = ProcFd::new().capture().unwrap();
        assert_eq!(snapshot.count_matches(&name), 0);
    }
}
