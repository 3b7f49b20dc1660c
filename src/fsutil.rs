use std::io;
use std::path::{Path, PathBuf};

/// Error that occurs when listing a directory fails.
#[derive(Debug, thiserror::Error)]
#[error("failed to read directory `{path}`: {source}")]
pub struct ReadDirError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Returns the paths of all entries in the directory at `path`.
///
/// Entries that vanish while the directory is being iterated are skipped.
///
/// # Errors
///
/// Returns a [`ReadDirError`] if the directory cannot be opened or iterated.
///
/// # Example
/// ```no_run
/// # use fdcount::fsutil;
/// let entries = fsutil::list_dir("/proc/self/fd")?;
/// # Ok::<(), fsutil::ReadDirError>(())
/// ```
pub fn list_dir(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, ReadDirError> {
    let path = path.as_ref();
    let to_err = |source| ReadDirError {
        path: path.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path).map_err(to_err)? {
        match entry {
            Ok(entry) => entries.push(entry.path()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(to_err(err)),
        }
    }
    Ok(entries)
}
