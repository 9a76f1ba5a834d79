use serde::Deserialize;
use std::path::PathBuf;

/// Test settings provides a way to point the `integ` tests at a live cluster using environment
/// variables.
pub struct TestSettings {}

impl TestSettings {
    /// The kubeconfig of the cluster under test. `None` means the default kubeconfig.
    pub fn kubeconfig() -> Option<PathBuf> {
        TEST_SETTINGS.kubeconfig.clone()
    }

    /// The namespace that MTV is installed in.
    pub fn namespace() -> &'static str {
        TEST_SETTINGS.namespace.as_str()
    }

    /// The vSphere provider whose inventory is queried.
    pub fn provider() -> &'static str {
        TEST_SETTINGS.provider.as_str()
    }

    /// A VM that is known to exist in the provider's inventory.
    pub fn vm() -> &'static str {
        TEST_SETTINGS.vm.as_str()
    }
}

#[derive(Debug, Deserialize)]
struct Inner {
    /// # Example
    ///
    /// ```text
    /// MTV_SELFTEST_KUBECONFIG=/wherever/kubeconfig
    /// ```
    #[serde(default)]
    kubeconfig: Option<PathBuf>,

    #[serde(default = "namespace")]
    namespace: String,

    #[serde(default = "provider")]
    provider: String,

    #[serde(default = "vm")]
    vm: String,
}

lazy_static::lazy_static! {
    static ref TEST_SETTINGS: Inner =
        envy::prefixed("MTV_SELFTEST_")
            .from_env::<Inner>()
            .expect("Error parsing TestSettings environment variables");
}

// We need these to provide defaults for serde.
fn namespace() -> String {
    String::from("openshift-mtv")
}

fn provider() -> String {
    String::from("vs8")
}

fn vm() -> String {
    String::from("mtv-rhel8-warm-2disks2nics")
}
