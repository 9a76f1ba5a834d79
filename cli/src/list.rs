use anyhow::{Context, Result};
use clap::Parser;
use model::ResourceTracker;

/// List the tracked resources in the order they were created.
#[derive(Debug, Parser)]
pub(crate) struct List {
    /// Output the resources in JSON format.
    #[clap(long = "json")]
    json: bool,
}

impl List {
    pub(crate) async fn run(self, mut tracker: ResourceTracker) -> Result<()> {
        tracker.restore().await.context(format!(
            "Unable to read tracked resources from '{}'",
            tracker.state_file().display()
        ))?;
        let resources = tracker.list();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&resources)
                    .context("Could not create string from resources.")?
            );
        } else if resources.is_empty() {
            println!("No tracked resources");
        } else {
            for resource in &resources {
                println!("{}\t{}", resource, resource.delete_path());
            }
        }
        Ok(())
    }
}
