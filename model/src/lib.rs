/*!

This library provides the resource tracker, the snapshot poller and the cluster clients used by the
MTV end-to-end test harness.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use error::{Error, Result};
pub use poller::{ClusterInventory, Inventory, SnapshotPoller};
pub use provider_config::{ProviderConfig, ProviderTable, ProviderType};
pub use resource::TrackedResource;
pub use settings::HarnessSettings;
pub use snapshot::{snapshot_warning, SnapshotInfo, VmRecord};
pub use tracker::{CleanupSummary, DeleteExecutor, ResourceTracker};
pub use warm_migration::WarmMigrationGuard;

pub mod clients;
pub mod constants;
mod error;
pub mod poller;
pub mod probe;
mod provider_config;
mod resource;
mod settings;
mod snapshot;
pub mod tracker;
mod warm_migration;
