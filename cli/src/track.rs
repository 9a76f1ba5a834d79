use anyhow::{Context, Result};
use clap::Parser;
use model::{ResourceTracker, TrackedResource};

/// Record a resource created by a test so that `cleanup` deletes it.
#[derive(Debug, Parser)]
pub(crate) struct Track {
    /// The plural resource type, e.g. `plans`, `providers` or `projects`.
    #[clap(long = "type", short = 't')]
    resource_type: String,

    /// The name of the resource.
    #[clap(long, short = 'n')]
    name: String,

    /// The namespace of the resource. Omit for cluster-scoped resources.
    #[clap(long)]
    namespace: Option<String>,

    /// The `group/version` of the resource. Defaults from the resource type.
    #[clap(long = "api-version")]
    api_version: Option<String>,
}

impl Track {
    pub(crate) async fn run(self, mut tracker: ResourceTracker) -> Result<()> {
        tracker.restore().await.context(format!(
            "Unable to read tracked resources from '{}'",
            tracker.state_file().display()
        ))?;

        let mut resource = match self.namespace {
            Some(namespace) => {
                TrackedResource::namespaced(namespace, self.resource_type, self.name)
            }
            None => TrackedResource::cluster_scoped(self.resource_type, self.name),
        };
        if let Some(api_version) = self.api_version {
            resource = resource.with_api_version(api_version);
        }
        println!("Tracking {}", resource);
        tracker.add(resource);

        tracker.persist().await.context(format!(
            "Unable to save tracked resources to '{}'",
            tracker.state_file().display()
        ))?;
        Ok(())
    }
}
