use super::error::{self, Result};
use super::Inventory;
use crate::clients::{resolve_bearer_token, ClusterClient, HttpStatusCode, InventoryClient};
use crate::constants::{ANNOTATION_REFRESHED_AT, INVENTORY_ROUTE};
use crate::SnapshotInfo;
use chrono::{SecondsFormat, Utc};
use snafu::{OptionExt, ResultExt};

/// An [`Inventory`] backed by a live cluster. The provider UID and the inventory route are read
/// through the Kubernetes API, and the VM list comes from the inventory service.
#[derive(Clone)]
pub struct ClusterInventory {
    cluster: ClusterClient,
    token: Option<String>,
    inventory_scheme: String,
}

impl ClusterInventory {
    pub fn new(cluster: ClusterClient) -> Self {
        Self {
            cluster,
            token: None,
            inventory_scheme: "https".to_string(),
        }
    }

    /// Use `token` for the inventory service instead of the token of the current `oc` login.
    pub fn with_token<S>(mut self, token: S) -> Self
    where
        S: Into<String>,
    {
        self.token = Some(token.into());
        self
    }

    /// Reach the inventory route host with `scheme` instead of `https`, e.g. `http` when the
    /// route is served through a plain proxy.
    pub fn with_inventory_scheme<S>(mut self, scheme: S) -> Self
    where
        S: Into<String>,
    {
        self.inventory_scheme = scheme.into();
        self
    }

    async fn inventory_client(&self) -> Result<InventoryClient> {
        let host = self
            .cluster
            .inventory_host()
            .await
            .context(error::ClientSnafu {
                action: "read the inventory route",
            })?
            .context(error::NotFoundSnafu {
                what: format!(
                    "route '{}' in namespace '{}'",
                    INVENTORY_ROUTE,
                    self.cluster.namespace()
                ),
            })?;
        let token = resolve_bearer_token(self.token.clone())
            .await
            .context(error::ClientSnafu {
                action: "get a bearer token",
            })?;
        let base_url = format!("{}://{}", self.inventory_scheme, host);
        InventoryClient::new(base_url, token).context(error::ClientSnafu {
            action: "create the inventory client",
        })
    }
}

#[async_trait::async_trait]
impl Inventory for ClusterInventory {
    async fn snapshot_info(&self, vm_name: &str, provider_name: &str) -> Result<SnapshotInfo> {
        let provider_uid = self
            .cluster
            .provider_uid(provider_name)
            .await
            .context(error::ClientSnafu {
                action: format!("read provider '{}'", provider_name),
            })?
            .context(error::NotFoundSnafu {
                what: format!(
                    "provider '{}' in namespace '{}'",
                    provider_name,
                    self.cluster.namespace()
                ),
            })?;
        let vm = self
            .inventory_client()
            .await?
            .find_vm(&provider_uid, vm_name)
            .await
            .context(error::ClientSnafu {
                action: format!("list the VMs of provider '{}'", provider_name),
            })?
            .context(error::NotFoundSnafu {
                what: format!("VM '{}' in provider '{}'", vm_name, provider_name),
            })?;
        Ok(SnapshotInfo::from(vm))
    }

    async fn request_refresh(&self, provider_name: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        match self
            .cluster
            .annotate_provider(provider_name, ANNOTATION_REFRESHED_AT, &now)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => error::NotFoundSnafu {
                what: format!(
                    "provider '{}' in namespace '{}'",
                    provider_name,
                    self.cluster.namespace()
                ),
            }
            .fail(),
            Err(e) => Err(e).context(error::ClientSnafu {
                action: format!("refresh provider '{}'", provider_name),
            }),
        }
    }
}
