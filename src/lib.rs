//! fdcount: a file descriptor leak detector for tests.
//!
//! The crate snapshots the open file descriptors of the current process,
//! counts the lines matching a literal substring, and later asserts that the
//! count changed by an expected amount. On mismatch the returned error carries
//! a report of which descriptor lines were added and removed.
//!
//! ```no_run
//! use fdcount::Counter;
//!
//! let (_, counter) = Counter::matching("TCP")?;
//! let stream = std::net::TcpListener::bind("127.0.0.1:0")?;
//! counter.assert_delta(1)?;
//! drop(stream);
//! counter.assert_delta(0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Snapshots come from `lsof -p <pid>` by default (see [`snapshot::Lsof`]).
//! Use [`Counter::matching_with`] together with [`snapshot::ProcFd`] or a
//! custom [`SnapshotSource`] to avoid depending on `lsof`.
//!
//! The crate logs through the [`log`] facade and never installs a logger.
pub mod counter;
pub mod error;
pub mod fsutil;
pub mod snapshot;

pub use counter::{Counter, DiffReport, render_diff};
pub use error::{DeltaMismatch, Error, Result};
pub use snapshot::{Snapshot, SnapshotSource};
