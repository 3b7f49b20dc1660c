use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{Error, Result, Snapshot, SnapshotSource};

/// Environment variable overriding the `lsof` executable.
pub const LSOF_PROGRAM_ENV: &str = "FDCOUNT_LSOF";

const DEFAULT_PROGRAM: &str = "lsof";

/// Snapshots open file descriptors by running `lsof -p <pid>`.
///
/// The executable is looked up on `PATH` unless [`LSOF_PROGRAM_ENV`] is set
/// or [`with_program`](Lsof::with_program) is used. Each capture spawns
/// exactly one process and blocks until it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lsof {
    program: PathBuf,
    pid: u32,
}

impl Lsof {
    /// Creates a source listing the current process.
    pub fn new() -> Self {
        let program = std::env::var_os(LSOF_PROGRAM_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM));
        Self {
            program,
            pid: std::process::id(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Default for Lsof {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for Lsof {
    /// Runs the lister and splits its standard output into lines.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if the program cannot be started.
    /// - [`Error::ExitStatus`] if it exits unsuccessfully.
    fn capture(&self) -> Result<Snapshot> {
        let program = self.program.display().to_string();
        log::debug!("Capturing file descriptors: {} -p {}", program, self.pid);

        let output = Command::new(&self.program)
            .arg("-p")
            .arg(self.pid.to_string())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ExitStatus {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let snapshot = Snapshot::from_output(&String::from_utf8_lossy(&output.stdout));
        log::debug!("`{}` listed {} lines", program, snapshot.len());
        Ok(snapshot)
    }
}
