use crate::constants::{CONSOLE_K8S_PREFIX, FORKLIFT_API_VERSION, PROJECTS, PROJECT_API_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A cluster object created by a test run that must be deleted when the run is over.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedResource {
    /// The namespace of the object. `None` (or an empty string) for cluster-scoped kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// The plural kind, e.g. `providers` or `networkmaps`.
    pub resource_type: String,
    pub resource_name: String,
    /// The `group/version` of the kind. Filled in by `ResourceTracker::add` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl TrackedResource {
    pub fn namespaced<S1, S2, S3>(namespace: S1, resource_type: S2, resource_name: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            namespace: Some(namespace.into()),
            resource_type: resource_type.into(),
            resource_name: resource_name.into(),
            api_version: None,
        }
    }

    pub fn cluster_scoped<S1, S2>(resource_type: S1, resource_name: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            namespace: None,
            resource_type: resource_type.into(),
            resource_name: resource_name.into(),
            api_version: None,
        }
    }

    pub fn with_api_version<S>(mut self, api_version: S) -> Self
    where
        S: Into<String>,
    {
        self.api_version = Some(api_version.into());
        self
    }

    /// The namespace, treating an empty string the same as no namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// The api version, falling back to the default for this resource type.
    pub fn api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or_else(|| default_api_version(&self.resource_type))
    }

    /// The console proxy path used to delete this object.
    pub fn delete_path(&self) -> String {
        match self.namespace() {
            Some(namespace) => format!(
                "{}/{}/namespaces/{}/{}/{}",
                CONSOLE_K8S_PREFIX,
                self.api_version(),
                namespace,
                self.resource_type,
                self.resource_name
            ),
            None => format!(
                "{}/{}/{}/{}",
                CONSOLE_K8S_PREFIX,
                self.api_version(),
                self.resource_type,
                self.resource_name
            ),
        }
    }
}

impl Display for TrackedResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.namespace() {
            Some(namespace) => write!(
                f,
                "{} {}/{}",
                self.resource_type, namespace, self.resource_name
            ),
            None => write!(f, "{} {}", self.resource_type, self.resource_name),
        }
    }
}

/// The api version used for `resource_type` when none is given.
pub(crate) fn default_api_version(resource_type: &str) -> &'static str {
    match resource_type {
        PROJECTS => PROJECT_API_VERSION,
        _ => FORKLIFT_API_VERSION,
    }
}
