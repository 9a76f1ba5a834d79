use crate::clients::error::{self, Result};
use crate::clients::AllowNotFound;
use crate::constants::{
    FORKLIFT_GROUP, FORKLIFT_VERSION, INVENTORY_ROUTE, ROUTE_GROUP, ROUTE_VERSION,
};
use kube::api::{Patch, PatchParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use log::{debug, trace};
use serde_json::json;
use snafu::ResultExt;
use std::path::Path;

/// Reads and annotates the MTV objects the snapshot poller depends on.
#[derive(Clone)]
pub struct ClusterClient {
    k8s_client: Client,
    namespace: String,
}

impl ClusterClient {
    /// Create a `ClusterClient` using the default `kube::Client`.
    pub async fn new<S>(namespace: S) -> Result<Self>
    where
        S: Into<String>,
    {
        let k8s_client = Client::try_default()
            .await
            .context(error::InitializationSnafu)?;
        Ok(Self::new_from_k8s_client(k8s_client, namespace))
    }

    /// Create a `ClusterClient` from the path to a kubeconfig file.
    pub async fn new_from_kubeconfig_path<S>(kubeconfig_path: &Path, namespace: S) -> Result<Self>
    where
        S: Into<String>,
    {
        let kubeconfig = Kubeconfig::read_from(kubeconfig_path).context(error::KubeconfigReadSnafu)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context(error::KubeconfigReadSnafu)?;
        let k8s_client = Client::try_from(config).context(error::InitializationSnafu)?;
        Ok(Self::new_from_k8s_client(k8s_client, namespace))
    }

    pub fn new_from_k8s_client<S>(k8s_client: Client, namespace: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            k8s_client,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn provider_api(&self) -> Api<DynamicObject> {
        let resource = ApiResource::from_gvk(&GroupVersionKind::gvk(
            FORKLIFT_GROUP,
            FORKLIFT_VERSION,
            "Provider",
        ));
        Api::namespaced_with(self.k8s_client.clone(), &self.namespace, &resource)
    }

    fn route_api(&self) -> Api<DynamicObject> {
        let resource =
            ApiResource::from_gvk(&GroupVersionKind::gvk(ROUTE_GROUP, ROUTE_VERSION, "Route"));
        Api::namespaced_with(self.k8s_client.clone(), &self.namespace, &resource)
    }

    /// The UID of the `Provider` named `name`, or `None` if it does not exist or has no UID.
    pub async fn provider_uid(&self, name: &str) -> Result<Option<String>> {
        let provider = self
            .provider_api()
            .get(name)
            .await
            .allow_not_found(|_| debug!("Provider '{}' was not found", name))
            .context(error::KubeApiCallSnafu {
                method: "get",
                what: format!("provider '{}'", name),
            })?;
        let found = provider.is_some();
        let uid = provider
            .and_then(|provider| provider.metadata.uid)
            .filter(|uid| !uid.is_empty());
        if found && uid.is_none() {
            debug!("Provider '{}' has no UID", name);
        }
        Ok(uid)
    }

    /// The host of the inventory route, or `None` if the route does not exist or has no host.
    pub async fn inventory_host(&self) -> Result<Option<String>> {
        let route = self
            .route_api()
            .get(INVENTORY_ROUTE)
            .await
            .allow_not_found(|_| debug!("Route '{}' was not found", INVENTORY_ROUTE))
            .context(error::KubeApiCallSnafu {
                method: "get",
                what: format!("route '{}'", INVENTORY_ROUTE),
            })?;
        let host = route
            .as_ref()
            .and_then(|route| route.data.get("spec"))
            .and_then(|spec| spec.get("host"))
            .and_then(|host| host.as_str())
            .filter(|host| !host.is_empty())
            .map(str::to_string);
        if route.is_some() && host.is_none() {
            debug!("Route '{}' has no host", INVENTORY_ROUTE);
        }
        Ok(host)
    }

    /// Set annotation `key` to `value` on the `Provider` named `name`, overwriting any previous
    /// value.
    pub async fn annotate_provider(&self, name: &str, key: &str, value: &str) -> Result<()> {
        trace!("annotating provider '{}' with {}={}", name, key, value);
        let patch = json!({ "metadata": { "annotations": { key: value } } });
        self.provider_api()
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .context(error::KubeApiCallSnafu {
                method: "annotate",
                what: format!("provider '{}'", name),
            })?;
        Ok(())
    }
}
