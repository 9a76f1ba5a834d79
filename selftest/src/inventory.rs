use model::poller::{Error, Inventory, Result};
use model::SnapshotInfo;
use std::collections::HashMap;
use std::sync::Mutex;

/// A call made to a [`ScriptedInventory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    Check(String),
    Refresh(String),
}

/// An [`Inventory`] whose snapshot counts follow a script.
///
/// Each VM has a sequence of counts. Every check consumes one value, and the last value repeats
/// forever. Counts only advance on checks, so a test decides how many checks it takes for a VM
/// to become clean independently of how often the inventory is refreshed.
#[derive(Debug, Default)]
pub struct ScriptedInventory {
    vms: Mutex<HashMap<String, Script>>,
    refresh_error: Option<String>,
    events: Mutex<Vec<InventoryEvent>>,
}

#[derive(Debug)]
struct Script {
    id: String,
    counts: Vec<usize>,
    next: usize,
}

impl Script {
    fn advance(&mut self) -> usize {
        let index = self.next.min(self.counts.len().saturating_sub(1));
        self.next += 1;
        self.counts.get(index).copied().unwrap_or_default()
    }
}

impl ScriptedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a VM whose successive checks report `counts`.
    pub fn vm<S>(self, name: S, counts: &[usize]) -> Self
    where
        S: Into<String>,
    {
        let name = name.into();
        self.vms.lock().expect("vms lock poisoned").insert(
            name.clone(),
            Script {
                id: format!("vm-{}", name),
                counts: counts.to_vec(),
                next: 0,
            },
        );
        self
    }

    /// Make every refresh request fail as if the provider did not exist.
    pub fn failing_refresh<S>(mut self, what: S) -> Self
    where
        S: Into<String>,
    {
        self.refresh_error = Some(what.into());
        self
    }

    /// Every call in the order it was made.
    pub fn events(&self) -> Vec<InventoryEvent> {
        self.events.lock().expect("events lock poisoned").clone()
    }

    pub fn checks(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, InventoryEvent::Check(_)))
            .count()
    }

    pub fn refreshes(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, InventoryEvent::Refresh(_)))
            .count()
    }

    fn record(&self, event: InventoryEvent) {
        self.events.lock().expect("events lock poisoned").push(event);
    }
}

#[async_trait::async_trait]
impl Inventory for ScriptedInventory {
    async fn snapshot_info(&self, vm_name: &str, provider_name: &str) -> Result<SnapshotInfo> {
        self.record(InventoryEvent::Check(vm_name.to_string()));
        let mut vms = self.vms.lock().expect("vms lock poisoned");
        match vms.get_mut(vm_name) {
            Some(script) => Ok(SnapshotInfo::new(
                vm_name,
                script.id.clone(),
                script.advance(),
            )),
            None => Err(Error::NotFound {
                what: format!("VM '{}' in provider '{}'", vm_name, provider_name),
            }),
        }
    }

    async fn request_refresh(&self, provider_name: &str) -> Result<()> {
        self.record(InventoryEvent::Refresh(provider_name.to_string()));
        match &self.refresh_error {
            None => Ok(()),
            Some(what) => Err(Error::NotFound { what: what.clone() }),
        }
    }
}
