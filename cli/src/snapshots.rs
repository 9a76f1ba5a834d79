use anyhow::{Context, Result};
use clap::Parser;
use model::clients::ClusterClient;
use model::constants::{WAIT_CLEAN_INTERVAL_MS, WAIT_CLEAN_TIMEOUT_MS};
use model::{snapshot_warning, ClusterInventory, HarnessSettings, SnapshotInfo, SnapshotPoller};
use std::path::PathBuf;
use std::time::Duration;

/// Inspect or wait on the snapshots of vSphere VMs.
#[derive(Debug, Parser)]
pub(crate) enum Snapshots {
    /// Print the snapshot state of one or more VMs.
    Check(Check),
    /// Fail if the VM has any snapshots.
    RequireClean(RequireClean),
    /// Ask the inventory to re-read the provider.
    Refresh(Refresh),
    /// Wait until the VM has no snapshots.
    Wait(Wait),
}

/// Where to find the provider and how to reach the cluster. Unset values come from the harness
/// environment (`VSPHERE_PROVIDER_NAME`, `MTV_NAMESPACE`, `CLUSTER_TOKEN`).
#[derive(Debug, Parser)]
pub(crate) struct Target {
    /// Path to the kubeconfig file. Also can be passed with the KUBECONFIG environment variable.
    #[clap(long = "kubeconfig")]
    kubeconfig: Option<PathBuf>,

    /// The namespace that MTV is installed in.
    #[clap(long)]
    namespace: Option<String>,

    /// The name of the vSphere provider.
    #[clap(long)]
    provider: Option<String>,

    /// The bearer token for the inventory service. Defaults to `oc whoami -t`.
    #[clap(long)]
    token: Option<String>,
}

impl Target {
    async fn poller(&self) -> Result<(SnapshotPoller<ClusterInventory>, String)> {
        let settings = HarnessSettings::from_env().context("Unable to read harness settings")?;
        let namespace = self
            .namespace
            .clone()
            .unwrap_or_else(|| settings.mtv_namespace.clone());
        let provider = self
            .provider
            .clone()
            .unwrap_or_else(|| settings.vsphere_provider_name.clone());

        let cluster = match &self.kubeconfig {
            Some(path) => ClusterClient::new_from_kubeconfig_path(path, namespace)
                .await
                .context(format!(
                    "Unable to create cluster client from path '{:?}'",
                    path
                ))?,
            None => ClusterClient::new(namespace)
                .await
                .context("Unable to create default cluster client")?,
        };
        let mut inventory = ClusterInventory::new(cluster);
        if let Some(token) = self.token.clone().or(settings.cluster_token) {
            inventory = inventory.with_token(token);
        }
        Ok((SnapshotPoller::new(inventory), provider))
    }
}

#[derive(Debug, Parser)]
pub(crate) struct Check {
    #[clap(flatten)]
    target: Target,

    /// Output the results in JSON format.
    #[clap(long = "json")]
    json: bool,

    /// The VMs to check.
    #[clap(required = true)]
    vms: Vec<String>,
}

#[derive(Debug, Parser)]
pub(crate) struct RequireClean {
    #[clap(flatten)]
    target: Target,

    /// The VM to check.
    vm: String,
}

#[derive(Debug, Parser)]
pub(crate) struct Refresh {
    #[clap(flatten)]
    target: Target,
}

#[derive(Debug, Parser)]
pub(crate) struct Wait {
    #[clap(flatten)]
    target: Target,

    /// How long to wait, in seconds.
    #[clap(long = "timeout", default_value_t = WAIT_CLEAN_TIMEOUT_MS / 1000)]
    timeout_secs: u64,

    /// How long to wait between checks, in seconds.
    #[clap(long = "interval", default_value_t = WAIT_CLEAN_INTERVAL_MS / 1000)]
    interval_secs: u64,

    /// The VM to wait on.
    vm: String,
}

impl Snapshots {
    pub(crate) async fn run(self) -> Result<()> {
        match self {
            Snapshots::Check(check) => check.run().await,
            Snapshots::RequireClean(require_clean) => require_clean.run().await,
            Snapshots::Refresh(refresh) => refresh.run().await,
            Snapshots::Wait(wait) => wait.run().await,
        }
    }
}

impl Check {
    async fn run(self) -> Result<()> {
        let (poller, provider) = self.target.poller().await?;
        let results = poller.check_many(&self.vms[..], &provider).await;

        let mut found = Vec::new();
        let mut failed = 0;
        for (vm_name, result) in results {
            match result {
                Ok(info) => found.push(info),
                Err(e) => {
                    failed += 1;
                    eprintln!("Unable to check VM '{}': {}", vm_name, e);
                }
            }
        }

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&found)
                    .context("Could not create string from snapshot state.")?
            );
        } else {
            for info in &found {
                print_info(info, &provider);
            }
        }
        anyhow::ensure!(failed == 0, "{} of {} VMs could not be checked", failed, self.vms.len());
        Ok(())
    }
}

impl RequireClean {
    async fn run(self) -> Result<()> {
        let (poller, provider) = self.target.poller().await?;
        let info = poller.fail_if_snapshots(&self.vm, &provider).await?;
        println!("VM '{}' has no snapshots", info.vm_name);
        Ok(())
    }
}

impl Refresh {
    async fn run(self) -> Result<()> {
        let (poller, provider) = self.target.poller().await?;
        poller.refresh_inventory(&provider).await?;
        println!("Provider '{}' inventory refreshed", provider);
        Ok(())
    }
}

impl Wait {
    async fn run(self) -> Result<()> {
        let (poller, provider) = self.target.poller().await?;
        let info = poller
            .wait_until_clean(
                &self.vm,
                &provider,
                Duration::from_secs(self.timeout_secs),
                Duration::from_secs(self.interval_secs),
            )
            .await?;
        println!("VM '{}' has no snapshots", info.vm_name);
        Ok(())
    }
}

fn print_info(info: &SnapshotInfo, provider: &str) {
    match snapshot_warning(info, provider) {
        Some(warning) => println!("{}", warning),
        None => println!("VM '{}' ({}) has no snapshots", info.vm_name, info.vm_id),
    }
}
