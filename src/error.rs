use crate::counter::DiffReport;
use crate::snapshot;

/// Errors returned by [`Counter`](crate::Counter) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The descriptor listing could not be captured.
    #[error("failed to snapshot open file descriptors: {0}")]
    ExternalTool(#[from] snapshot::Error),
    /// The observed delta differs from the expected one.
    #[error(transparent)]
    DeltaMismatch(#[from] DeltaMismatch),
}

impl Error {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::DeltaMismatch(_))
    }

    pub fn as_mismatch(&self) -> Option<&DeltaMismatch> {
        match self {
            Error::DeltaMismatch(mismatch) => Some(mismatch),
            Error::ExternalTool(_) => None,
        }
    }
}

/// An assertion failure carrying the expected and observed deltas plus a
/// report of which descriptor lines changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected file descriptor count: expected {expected}, have {actual}\n\n{report}")]
pub struct DeltaMismatch {
    pub expected: i64,
    pub actual: i64,
    pub report: DiffReport,
}

pub type Result<T> = std::result::Result<T, Error>;
