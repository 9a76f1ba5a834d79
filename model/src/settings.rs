use crate::constants::{
    DEFAULT_CONSOLE_URL, DEFAULT_NAMESPACE, DEFAULT_PROVIDER_NAME, DEFAULT_WARM_TEST_VM,
};
use crate::error::{self, Result};
use serde::Deserialize;
use snafu::ResultExt;

/// Harness settings that are passed to the test run using environment variables.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HarnessSettings {
    /// The vSphere VM used by warm migration tests.
    ///
    /// ```text
    /// WARM_TEST_VM=mtv-rhel8-warm-2disks2nics
    /// ```
    #[serde(default = "warm_test_vm")]
    pub warm_test_vm: String,

    /// The name of the vSphere `Provider` object in the cluster.
    #[serde(default = "vsphere_provider_name")]
    pub vsphere_provider_name: String,

    /// The namespace that MTV is installed in.
    #[serde(default = "mtv_namespace")]
    pub mtv_namespace: String,

    /// The console URL. `BRIDGE_BASE_ADDRESS` takes precedence over `BASE_ADDRESS`.
    #[serde(default)]
    pub bridge_base_address: Option<String>,
    #[serde(default)]
    pub base_address: Option<String>,

    /// A bearer token for the cluster. When absent the token is taken from `oc whoami -t`.
    #[serde(default)]
    pub cluster_token: Option<String>,
}

impl HarnessSettings {
    /// Read the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(envy::from_env::<Self>().context(error::EnvironmentSnafu)?)
    }

    /// Read the settings from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Self>(vars).context(error::EnvironmentSnafu)?)
    }

    pub fn console_url(&self) -> &str {
        self.bridge_base_address
            .as_deref()
            .or(self.base_address.as_deref())
            .unwrap_or(DEFAULT_CONSOLE_URL)
    }
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            warm_test_vm: warm_test_vm(),
            vsphere_provider_name: vsphere_provider_name(),
            mtv_namespace: mtv_namespace(),
            bridge_base_address: None,
            base_address: None,
            cluster_token: None,
        }
    }
}

// We need these to provide defaults for serde.
fn warm_test_vm() -> String {
    DEFAULT_WARM_TEST_VM.to_string()
}

fn vsphere_provider_name() -> String {
    DEFAULT_PROVIDER_NAME.to_string()
}

fn mtv_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

#[test]
fn settings_defaults() {
    let settings = HarnessSettings::from_vars(Vec::new()).unwrap();
    assert_eq!(settings, HarnessSettings::default());
    assert_eq!(settings.console_url(), "http://localhost:9000");
    assert_eq!(settings.vsphere_provider_name, "vs8");
}

#[test]
fn settings_from_vars() {
    let settings = HarnessSettings::from_vars(vec![
        ("WARM_TEST_VM".to_string(), "warm-2".to_string()),
        ("BASE_ADDRESS".to_string(), "https://base".to_string()),
        ("BRIDGE_BASE_ADDRESS".to_string(), "https://bridge".to_string()),
        ("CLUSTER_TOKEN".to_string(), "sha256~abc".to_string()),
    ])
    .unwrap();
    assert_eq!(settings.warm_test_vm, "warm-2");
    assert_eq!(settings.console_url(), "https://bridge");
    assert_eq!(settings.cluster_token.as_deref(), Some("sha256~abc"));
}
