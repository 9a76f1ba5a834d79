use crate::clients::error::{self, Result};
use crate::VmRecord;
use log::trace;
use snafu::{ensure, ResultExt};

/// A client for the Forklift inventory service.
#[derive(Clone, Debug)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl InventoryClient {
    /// `base_url` is the scheme and host of the inventory route, e.g.
    /// `https://forklift-inventory-openshift-mtv.apps.example.com`.
    pub fn new<S1, S2>(base_url: S1, token: S2) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        // The inventory route is served with a cluster-internal certificate.
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context(error::HttpClientSnafu)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// All VMs the inventory knows for the vSphere provider with `provider_uid`.
    pub async fn vsphere_vms(&self, provider_uid: &str) -> Result<Vec<VmRecord>> {
        let url = format!("{}/providers/vsphere/{}/vms", self.base_url, provider_uid);
        trace!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .context(error::RequestSnafu {
                method: "GET",
                url: &url,
            })?;
        let status = response.status();
        ensure!(
            status.is_success(),
            error::ResponseStatusSnafu { url: &url, status }
        );
        Ok(response
            .json::<Vec<VmRecord>>()
            .await
            .context(error::ResponseBodySnafu { url: &url })?)
    }

    /// The VM named `vm_name`, or `None` if the inventory does not have it.
    pub async fn find_vm(&self, provider_uid: &str, vm_name: &str) -> Result<Option<VmRecord>> {
        Ok(self
            .vsphere_vms(provider_uid)
            .await?
            .into_iter()
            .find(|vm| vm.name == vm_name))
    }
}
