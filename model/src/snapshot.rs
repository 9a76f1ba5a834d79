use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// The snapshot state of one VM as reported by the provider inventory.
///
/// Whether the VM has snapshots is always derived from `snapshot_count`, so the two can never
/// disagree.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub vm_name: String,
    pub vm_id: String,
    pub snapshot_count: usize,
}

impl SnapshotInfo {
    pub fn new<S1, S2>(vm_name: S1, vm_id: S2, snapshot_count: usize) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            vm_name: vm_name.into(),
            vm_id: vm_id.into(),
            snapshot_count,
        }
    }

    pub fn has_snapshots(&self) -> bool {
        self.snapshot_count > 0
    }
}

impl From<VmRecord> for SnapshotInfo {
    fn from(vm: VmRecord) -> Self {
        let snapshot_count = vm.snapshot_count();
        Self {
            vm_name: vm.name,
            vm_id: vm.id,
            snapshot_count,
        }
    }
}

// `hasSnapshots` is written out for readers of the JSON form but is never read back.
impl Serialize for SnapshotInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SnapshotInfo", 4)?;
        state.serialize_field("vmName", &self.vm_name)?;
        state.serialize_field("vmId", &self.vm_id)?;
        state.serialize_field("snapshotCount", &self.snapshot_count)?;
        state.serialize_field("hasSnapshots", &self.has_snapshots())?;
        state.end()
    }
}

/// A VM entry from the inventory's `/providers/vsphere/{uid}/vms` collection. Only the fields the
/// harness needs are kept.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct VmRecord {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub snapshots: Option<Vec<serde_json::Value>>,
}

impl VmRecord {
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.as_ref().map(Vec::len).unwrap_or_default()
    }
}

/// The remediation text printed when a warm-migration VM has leftover snapshots. Returns `None`
/// when the VM is clean.
pub fn snapshot_warning(info: &SnapshotInfo, provider_name: &str) -> Option<String> {
    if !info.has_snapshots() {
        return None;
    }
    Some(format!(
        "VM '{vm}' has {count} snapshot(s), warm migration will not work until they are removed.\n\
         To fix:\n\
         \x20 1. Log into vSphere vCenter\n\
         \x20 2. Find VM: {vm}\n\
         \x20 3. Right-click > Snapshots > Manage Snapshots\n\
         \x20 4. Delete ALL snapshots\n\
         Or run: ./cleanup-vsphere-snapshots.sh {vm} {provider}",
        vm = info.vm_name,
        count = info.snapshot_count,
        provider = provider_name,
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn has_snapshots_is_derived() {
        assert!(!SnapshotInfo::new("vm", "vm-1", 0).has_snapshots());
        assert!(SnapshotInfo::new("vm", "vm-1", 1).has_snapshots());
        assert!(SnapshotInfo::new("vm", "vm-1", 7).has_snapshots());
    }

    #[test]
    fn missing_or_null_snapshots_count_as_zero() {
        let missing: VmRecord = serde_json::from_value(json!({"name": "a", "id": "vm-1"})).unwrap();
        let null: VmRecord =
            serde_json::from_value(json!({"name": "a", "id": "vm-1", "snapshots": null})).unwrap();
        let empty: VmRecord =
            serde_json::from_value(json!({"name": "a", "id": "vm-1", "snapshots": []})).unwrap();
        for vm in [missing, null, empty] {
            let info = SnapshotInfo::from(vm);
            assert_eq!(info.snapshot_count, 0);
            assert!(!info.has_snapshots());
        }
    }

    #[test]
    fn json_includes_derived_flag() {
        let value = serde_json::to_value(SnapshotInfo::new("warm-vm", "vm-42", 2)).unwrap();
        assert_eq!(
            value,
            json!({
                "vmName": "warm-vm",
                "vmId": "vm-42",
                "snapshotCount": 2,
                "hasSnapshots": true
            })
        );
    }

    #[test]
    fn warning_only_for_dirty_vms() {
        assert!(snapshot_warning(&SnapshotInfo::new("vm", "id", 0), "vs8").is_none());
        let warning = snapshot_warning(&SnapshotInfo::new("vm", "id", 3), "vs8").unwrap();
        assert!(warning.contains("has 3 snapshot(s)"));
        assert!(warning.contains("cleanup-vsphere-snapshots.sh vm vs8"));
    }
}
