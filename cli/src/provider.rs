use anyhow::{Context, Result};
use clap::Parser;
use model::constants::PROVIDERS_FILE;
use model::ProviderTable;
use std::path::PathBuf;

/// Show the source providers configured for the test run. Passwords are never printed.
#[derive(Debug, Parser)]
pub(crate) struct Provider {
    /// The provider table file.
    #[clap(long = "file", default_value = PROVIDERS_FILE)]
    file: PathBuf,

    /// The provider to show. All provider keys are listed when omitted.
    key: Option<String>,
}

impl Provider {
    pub(crate) fn run(self) -> Result<()> {
        let table = ProviderTable::from_path(&self.file).context(format!(
            "Unable to load the provider table from '{}'",
            self.file.display()
        ))?;

        match self.key {
            None => {
                for key in table.keys() {
                    println!("{}", key);
                }
            }
            Some(key) => {
                let mut provider = table
                    .get(&key)
                    .context(format!("Unable to show provider '{}'", key))?
                    .clone();
                provider.password = None;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&provider)
                        .context("Could not create string from provider.")?
                );
            }
        }
        Ok(())
    }
}
