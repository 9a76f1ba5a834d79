/*!

The snapshot poller answers "does this VM currently have snapshots?" against the provider
inventory, and builds blocking helpers on top of that question for warm migration tests.

!*/

pub use cluster::ClusterInventory;
pub use error::{Error, ErrorKind, Result};

mod cluster;
mod error;

use crate::constants::INVENTORY_SETTLE_MS;
use crate::SnapshotInfo;
use log::{debug, info};
use std::time::Duration;

/// The source of VM snapshot state. [`ClusterInventory`] queries a live cluster; tests use
/// scripted implementations.
#[async_trait::async_trait]
pub trait Inventory: Send + Sync {
    /// Look up `vm_name` in the inventory of the provider named `provider_name`.
    async fn snapshot_info(&self, vm_name: &str, provider_name: &str) -> Result<SnapshotInfo>;

    /// Ask the inventory to re-read the provider. This returns as soon as the request has been
    /// accepted; the inventory refreshes asynchronously.
    async fn request_refresh(&self, provider_name: &str) -> Result<()>;
}

/// Queries and waits on VM snapshot state through an [`Inventory`].
#[derive(Debug, Clone)]
pub struct SnapshotPoller<I> {
    inventory: I,
    settle_delay: Duration,
}

impl<I> SnapshotPoller<I>
where
    I: Inventory,
{
    pub fn new(inventory: I) -> Self {
        Self {
            inventory,
            settle_delay: Duration::from_millis(INVENTORY_SETTLE_MS),
        }
    }

    /// How long `refresh_inventory` waits after requesting a refresh.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    /// The current snapshot state of `vm_name`.
    pub async fn check_snapshots(&self, vm_name: &str, provider_name: &str) -> Result<SnapshotInfo> {
        let info = self.inventory.snapshot_info(vm_name, provider_name).await?;
        debug!(
            "VM '{}' ({}) has {} snapshot(s)",
            info.vm_name, info.vm_id, info.snapshot_count
        );
        Ok(info)
    }

    /// Check several VMs one after the other. Each VM gets its own result so that one failed
    /// lookup does not hide the state of the others.
    pub async fn check_many<S>(
        &self,
        vm_names: &[S],
        provider_name: &str,
    ) -> Vec<(String, Result<SnapshotInfo>)>
    where
        S: AsRef<str>,
    {
        let mut results = Vec::with_capacity(vm_names.len());
        for vm_name in vm_names {
            let vm_name = vm_name.as_ref();
            let result = self.check_snapshots(vm_name, provider_name).await;
            results.push((vm_name.to_string(), result));
        }
        results
    }

    /// Fail with [`Error::Precondition`] if `vm_name` has any snapshots.
    pub async fn fail_if_snapshots(
        &self,
        vm_name: &str,
        provider_name: &str,
    ) -> Result<SnapshotInfo> {
        let info = self.check_snapshots(vm_name, provider_name).await?;
        if info.has_snapshots() {
            return error::PreconditionSnafu {
                vm_name: info.vm_name,
                snapshot_count: info.snapshot_count,
            }
            .fail();
        }
        Ok(info)
    }

    /// Request an inventory refresh for the provider and give the inventory time to settle.
    pub async fn refresh_inventory(&self, provider_name: &str) -> Result<()> {
        self.inventory.request_refresh(provider_name).await?;
        info!("Provider '{}' inventory refresh triggered", provider_name);
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    /// Wait until `vm_name` has no snapshots.
    ///
    /// ```text
    /// Start -> CheckImmediate -> Clean: Done
    ///                         -> Dirty: RefreshAndWait -> Check -> Clean: Done
    ///                                                           -> Dirty: RefreshAndWait (attempts remain)
    ///                                                           -> Dirty: TimedOut (attempts exhausted)
    /// ```
    ///
    /// The first check happens right away, so a clean VM returns without any refresh. After
    /// that, each of the `ceil(timeout / poll_interval)` attempts refreshes the inventory, waits
    /// `poll_interval`, and checks again. Since the inventory refreshes asynchronously, the bound
    /// only covers settle time and a check may still see stale data.
    pub async fn wait_until_clean(
        &self,
        vm_name: &str,
        provider_name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<SnapshotInfo> {
        let max_attempts = attempts_within(timeout, poll_interval);
        let poll_interval = poll_interval.max(Duration::from_millis(1));

        let mut info = self.check_snapshots(vm_name, provider_name).await?;
        let mut attempts = 0;
        while info.has_snapshots() {
            if attempts >= max_attempts {
                return error::TimeoutSnafu {
                    vm_name,
                    timeout,
                    attempts,
                    last_snapshot_count: info.snapshot_count,
                }
                .fail();
            }
            attempts += 1;
            info!(
                "VM '{}' still has {} snapshot(s), attempt {}/{}",
                vm_name, info.snapshot_count, attempts, max_attempts
            );
            self.refresh_inventory(provider_name).await?;
            tokio::time::sleep(poll_interval).await;
            info = self.check_snapshots(vm_name, provider_name).await?;
        }

        info!("VM '{}' has no snapshots", vm_name);
        Ok(info)
    }
}

/// The number of refresh-wait-check attempts that fit in `timeout`, i.e.
/// `ceil(timeout / poll_interval)`. A zero interval is treated as one millisecond.
pub fn attempts_within(timeout: Duration, poll_interval: Duration) -> u32 {
    let interval = poll_interval.as_millis().max(1);
    let attempts = (timeout.as_millis() + interval - 1) / interval;
    u32::try_from(attempts).unwrap_or(u32::MAX)
}

#[test]
fn attempts_within_test() {
    let secs = Duration::from_secs;
    assert_eq!(attempts_within(secs(20), secs(10)), 2);
    assert_eq!(attempts_within(secs(21), secs(10)), 3);
    assert_eq!(attempts_within(secs(120), secs(10)), 12);
    assert_eq!(attempts_within(secs(5), secs(10)), 1);
    assert_eq!(attempts_within(Duration::ZERO, secs(10)), 0);
    assert_eq!(attempts_within(Duration::from_millis(3), Duration::ZERO), 3);
}
