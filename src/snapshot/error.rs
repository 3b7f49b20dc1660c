use std::path::PathBuf;
use std::process::ExitStatus;

use crate::fsutil;

/// Errors that may occur while capturing a snapshot of open file descriptors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    ReadDir(#[from] fsutil::ReadDirError),
    #[error("failed to read link `{path}`: {source}")]
    ReadLink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
