/*!

Provides scripted stand-ins for the cluster so that the tracker and the poller can be tested
without a console, an inventory service or vSphere. Tests that need a real cluster read its
coordinates from `TestSettings`.

!*/

pub mod executor;
pub mod inventory;
mod test_settings;

pub use executor::{Reply, ScriptedExecutor};
pub use inventory::{InventoryEvent, ScriptedInventory};
pub use test_settings::TestSettings;
