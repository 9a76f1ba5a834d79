use snafu::Snafu;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for `SnapshotPoller`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to find {}", what))]
    NotFound { what: String },

    #[snafu(display("Unable to {}: {}", action, source))]
    Client {
        action: String,
        source: crate::clients::Error,
    },

    #[snafu(display(
        "VM '{}' has {} pre-existing snapshot(s), remove them before running warm migration tests",
        vm_name,
        snapshot_count
    ))]
    Precondition {
        vm_name: String,
        snapshot_count: usize,
    },

    #[snafu(display(
        "VM '{}' still has {} snapshot(s) after {:?} ({} attempts), manual cleanup required",
        vm_name,
        last_snapshot_count,
        timeout,
        attempts
    ))]
    Timeout {
        vm_name: String,
        timeout: Duration,
        attempts: u32,
        last_snapshot_count: usize,
    },
}

/// The broad category of an [`Error`], for callers that only care about what went wrong and not
/// where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The provider, the inventory route, or the VM does not exist.
    NotFound,
    /// A request, command, or response could not be completed or understood.
    Transport,
    /// The VM has snapshots and the caller required none.
    Precondition,
    /// A bounded wait ran out of attempts.
    Timeout,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Client { .. } => ErrorKind::Transport,
            Error::Precondition { .. } => ErrorKind::Precondition,
            Error::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}
