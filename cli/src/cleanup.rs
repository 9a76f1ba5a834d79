use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use model::clients::{ConsoleClient, ConsoleSession};
use model::constants::AUTH_STATE_FILE;
use model::probe::RetryConfig;
use model::{CleanupSummary, HarnessSettings, ResourceTracker};
use std::path::PathBuf;

/// Delete every tracked resource through the console's Kubernetes proxy. Failed deletes are
/// reported but do not make the command fail.
#[derive(Debug, Parser)]
pub(crate) struct Cleanup {
    /// The console URL. Defaults to `BRIDGE_BASE_ADDRESS`, then `BASE_ADDRESS`, then
    /// `http://localhost:9000`.
    #[clap(long = "console-url")]
    console_url: Option<String>,

    /// The browser storage-state file holding the logged-in session cookies.
    #[clap(long = "storage-state", default_value = AUTH_STATE_FILE)]
    storage_state: PathBuf,

    /// Use this CSRF token instead of the `csrf-token` session cookie.
    #[clap(long = "csrf-token")]
    csrf_token: Option<String>,

    /// Send this bearer token with every request.
    #[clap(long = "token")]
    token: Option<String>,

    /// Wait for the console to accept the session before deleting anything.
    #[clap(long = "wait-ready")]
    wait_ready: bool,

    /// The number of readiness attempts made with `--wait-ready`.
    #[clap(long = "ready-attempts", default_value = "5")]
    ready_attempts: u32,

    /// Output the summary in JSON format.
    #[clap(long = "json")]
    json: bool,
}

impl Cleanup {
    pub(crate) async fn run(self, mut tracker: ResourceTracker) -> Result<()> {
        tracker.restore().await.context(format!(
            "Unable to read tracked resources from '{}'",
            tracker.state_file().display()
        ))?;

        let summary = if tracker.is_empty() {
            CleanupSummary::default()
        } else {
            let client = self.console_client()?;
            if self.wait_ready {
                client
                    .wait_until_ready(&RetryConfig::with_max_attempts(self.ready_attempts))
                    .await
                    .context("The console did not accept the session")?;
            }
            let summary = tracker.cleanup_all(&client).await;
            // Save the emptied tracker so that a second cleanup does not repeat the deletes.
            tracker.persist().await.context(format!(
                "Unable to save tracked resources to '{}'",
                tracker.state_file().display()
            ))?;
            summary
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary)
                    .context("Could not create string from cleanup summary.")?
            );
        } else {
            println!(
                "Cleanup completed: {} successful, {} failed",
                summary.succeeded, summary.failed
            );
        }
        if summary.failed > 0 {
            warn!(
                "{} resources could not be deleted and may need manual cleanup",
                summary.failed
            );
        }
        Ok(())
    }

    fn console_client(&self) -> Result<ConsoleClient> {
        let settings = HarnessSettings::from_env().context("Unable to read harness settings")?;
        let console_url = self
            .console_url
            .clone()
            .unwrap_or_else(|| settings.console_url().to_string());

        let mut session = if self.storage_state.is_file() {
            ConsoleSession::from_storage_state(&self.storage_state).context(format!(
                "Unable to load the console session from '{}'",
                self.storage_state.display()
            ))?
        } else {
            warn!(
                "No storage state at '{}', sending requests without session cookies",
                self.storage_state.display()
            );
            ConsoleSession::default()
        };
        if let Some(csrf_token) = &self.csrf_token {
            session = session.with_csrf_token(csrf_token);
        }
        if let Some(token) = self.token.clone().or(settings.cluster_token) {
            session = session.with_bearer_token(token);
        }

        ConsoleClient::new(&console_url, session).context(format!(
            "Unable to create a console client for '{}'",
            console_url
        ))
    }
}
