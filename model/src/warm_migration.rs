use crate::poller::{Inventory, SnapshotPoller};
use crate::{snapshot_warning, HarnessSettings, SnapshotInfo};
use log::{error, info, warn};

/// Brackets a warm migration test with snapshot checks of the configured VM.
///
/// Neither check fails the test. A VM that starts with snapshots gets a warning with remediation
/// steps, and a VM that ends with snapshots gets an error so the leak is visible in the log.
pub struct WarmMigrationGuard<'a, I> {
    poller: &'a SnapshotPoller<I>,
    vm_name: String,
    provider_name: String,
    initial: Option<SnapshotInfo>,
}

impl<'a, I> WarmMigrationGuard<'a, I>
where
    I: Inventory,
{
    /// Check the warm test VM before the test body runs.
    pub async fn begin(poller: &'a SnapshotPoller<I>, settings: &HarnessSettings) -> Self {
        let vm_name = settings.warm_test_vm.clone();
        let provider_name = settings.vsphere_provider_name.clone();
        let initial = match poller.check_snapshots(&vm_name, &provider_name).await {
            Ok(info) => {
                match snapshot_warning(&info, &provider_name) {
                    Some(warning) => warn!("{}", warning),
                    None => info!("VM '{}' has no snapshots, ready for warm migration", vm_name),
                }
                Some(info)
            }
            Err(e) => {
                warn!("Could not check snapshots for VM '{}': {}", vm_name, e);
                None
            }
        };
        Self {
            poller,
            vm_name,
            provider_name,
            initial,
        }
    }

    pub fn vm_name(&self) -> &str {
        &self.vm_name
    }

    /// The state seen by `begin`, or `None` if that check failed.
    pub fn initial(&self) -> Option<&SnapshotInfo> {
        self.initial.as_ref()
    }

    /// Check the VM again after the test body. Returns the final state, or `None` if the check
    /// failed.
    pub async fn finish(self) -> Option<SnapshotInfo> {
        match self
            .poller
            .check_snapshots(&self.vm_name, &self.provider_name)
            .await
        {
            Ok(info) => {
                if info.has_snapshots() {
                    error!(
                        "VM '{}' has {} snapshot(s) after the test, they must be removed before the next warm migration run",
                        info.vm_name, info.snapshot_count
                    );
                }
                Some(info)
            }
            Err(e) => {
                warn!(
                    "Could not check snapshots for VM '{}' after the test: {}",
                    self.vm_name, e
                );
                None
            }
        }
    }
}
