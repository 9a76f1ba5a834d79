use crate::clients::StatusCode;
use crate::TrackedResource;
use futures::future::join_all;
use serde::Serialize;
use std::fmt::Display;

/// Sends delete requests on behalf of the [`ResourceTracker`](super::ResourceTracker). This is
/// implemented by the console client for real runs and by scripted executors in tests.
#[async_trait::async_trait]
pub trait DeleteExecutor: Sync {
    /// The error returned when a request could not be completed at all.
    type E: Display + Send + Sync + 'static;

    /// Issue a delete for the console proxy `path` and return the response status.
    async fn delete(&self, path: &str) -> Result<StatusCode, Self::E>;
}

/// What happened to a single resource during cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Deleted(StatusCode),
    /// The object did not exist, either because the test removed it or it was never created.
    AlreadyAbsent,
    Failed(String),
}

impl CleanupOutcome {
    fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Deleted(status)
        } else if status == StatusCode::NOT_FOUND {
            Self::AlreadyAbsent
        } else {
            Self::Failed(format!("HTTP {}", status))
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// The tally returned by `ResourceTracker::cleanup_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    /// Resources that were deleted or were already gone.
    pub succeeded: usize,
    pub failed: usize,
}

impl CleanupSummary {
    pub(super) fn record(&mut self, outcome: &CleanupOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Start a delete for every resource, then wait for all of them. Outcomes are returned in the
/// same order as `resources`.
pub(super) async fn delete_all<D>(executor: &D, resources: &[TrackedResource]) -> Vec<CleanupOutcome>
where
    D: DeleteExecutor,
{
    join_all(resources.iter().map(|resource| async move {
        match executor.delete(&resource.delete_path()).await {
            Ok(status) => CleanupOutcome::from_status(status),
            Err(e) => CleanupOutcome::Failed(e.to_string()),
        }
    }))
    .await
}

#[test]
fn outcome_from_status() {
    assert_eq!(
        CleanupOutcome::from_status(StatusCode::OK),
        CleanupOutcome::Deleted(StatusCode::OK)
    );
    assert_eq!(
        CleanupOutcome::from_status(StatusCode::ACCEPTED),
        CleanupOutcome::Deleted(StatusCode::ACCEPTED)
    );
    assert_eq!(
        CleanupOutcome::from_status(StatusCode::NOT_FOUND),
        CleanupOutcome::AlreadyAbsent
    );
    assert!(!CleanupOutcome::from_status(StatusCode::FORBIDDEN).is_success());
    assert!(!CleanupOutcome::from_status(StatusCode::INTERNAL_SERVER_ERROR).is_success());
}
