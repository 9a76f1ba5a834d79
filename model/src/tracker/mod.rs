/*!

The resource tracker records the cluster objects a test run creates so that they can be deleted
when the run is over, even if the deleting process is not the one that created them.

!*/

pub use cleanup::{CleanupOutcome, CleanupSummary, DeleteExecutor};
pub use error::{Error, Result};

mod cleanup;
mod error;

use crate::constants::RESOURCES_FILE;
use crate::resource::default_api_version;
use crate::TrackedResource;
use log::{debug, info, warn};
use snafu::ResultExt;
use std::path::{Path, PathBuf};

/// An ordered ledger of [`TrackedResource`]s. Insertion order is creation order and duplicates are
/// kept; deleting an object twice is harmless.
#[derive(Debug, Clone)]
pub struct ResourceTracker {
    resources: Vec<TrackedResource>,
    state_file: PathBuf,
}

impl Default for ResourceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTracker {
    /// A tracker that persists to the well-known state file.
    pub fn new() -> Self {
        Self::with_state_file(RESOURCES_FILE)
    }

    pub fn with_state_file<P>(state_file: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            resources: Vec::new(),
            state_file: state_file.into(),
        }
    }

    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Record a resource. The api version is filled in from the resource type when absent.
    pub fn add(&mut self, mut resource: TrackedResource) {
        if resource.api_version.is_none() {
            resource.api_version = Some(default_api_version(&resource.resource_type).to_string());
        }
        debug!("Tracking {}", resource);
        self.resources.push(resource);
    }

    pub fn count(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// A copy of the tracked resources in insertion order.
    pub fn list(&self) -> Vec<TrackedResource> {
        self.resources.clone()
    }

    /// Write every tracked resource to the state file, replacing its previous contents.
    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self
            .state_file
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent)
                .await
                .context(error::CreateDirSnafu { path: parent })?;
        }
        let data =
            serde_json::to_string_pretty(&self.resources).context(error::JsonSerializeSnafu)?;
        tokio::fs::write(&self.state_file, data)
            .await
            .context(error::WriteSnafu {
                path: &self.state_file,
            })?;
        debug!(
            "Saved {} resources to '{}'",
            self.resources.len(),
            self.state_file.display()
        );
        Ok(())
    }

    /// Replace the tracked resources with the contents of the state file. Returns `false`, leaving
    /// the tracker untouched, when there is nothing to restore: the file is missing or could not
    /// be parsed (for example because its writer was interrupted).
    pub async fn restore(&mut self) -> Result<bool> {
        let data = match tokio::fs::read_to_string(&self.state_file).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at '{}'", self.state_file.display());
                return Ok(false);
            }
            Err(e) => {
                return Err(e).context(error::ReadSnafu {
                    path: &self.state_file,
                })
            }
        };
        match serde_json::from_str::<Vec<TrackedResource>>(&data) {
            Ok(resources) => {
                info!(
                    "Restored {} resources from '{}'",
                    resources.len(),
                    self.state_file.display()
                );
                self.resources = resources;
                Ok(true)
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable state file '{}': {}",
                    self.state_file.display(),
                    e
                );
                Ok(false)
            }
        }
    }

    /// Delete every tracked resource through `executor`, then forget all of them.
    ///
    /// All deletes are started before any is awaited. A `2xx` or `404` response counts as
    /// success; anything else, including a transport error, is a failure of that resource only.
    /// Failures are logged and counted but never returned as an error, and the tracker is emptied
    /// whatever the outcome.
    pub async fn cleanup_all<D>(&mut self, executor: &D) -> CleanupSummary
    where
        D: DeleteExecutor,
    {
        if self.resources.is_empty() {
            info!("No resources to clean up");
            return CleanupSummary::default();
        }

        info!("Starting cleanup of {} resources", self.resources.len());
        let outcomes = cleanup::delete_all(executor, &self.resources).await;

        let mut summary = CleanupSummary::default();
        for (resource, outcome) in self.resources.iter().zip(outcomes) {
            match &outcome {
                CleanupOutcome::Deleted(status) => {
                    info!("Cleaned up {} ({})", resource, status)
                }
                CleanupOutcome::AlreadyAbsent => {
                    info!("Resource {} not found, skipping cleanup", resource)
                }
                CleanupOutcome::Failed(reason) => {
                    warn!("Failed to clean up {}: {}", resource, reason)
                }
            }
            summary.record(&outcome);
        }
        info!(
            "Cleanup completed: {} successful, {} failed",
            summary.succeeded, summary.failed
        );

        self.resources.clear();
        summary
    }
}
