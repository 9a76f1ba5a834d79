use crate::clients::error::{self, Result};
use crate::probe::{first_available, Candidate};
use log::debug;
use snafu::{ensure, OptionExt, ResultExt};
use std::time::Duration;
use tokio::process::Command;

/// How long `oc whoami -t` is given before it is skipped.
const OC_TIMEOUT: Duration = Duration::from_secs(10);

/// Find a bearer token for the cluster. An explicitly configured token is preferred, then the
/// token of the current `oc` login.
pub async fn resolve_bearer_token(configured: Option<String>) -> Result<String> {
    let candidates = vec![
        Candidate::new("configured token", async move {
            configured.filter(|token| !token.trim().is_empty())
        }),
        Candidate::new("oc whoami -t", async {
            match oc_whoami_token().await {
                Ok(token) => Some(token),
                Err(e) => {
                    debug!("{}", e);
                    None
                }
            }
        }),
    ];
    let (_, token) = first_available(candidates, OC_TIMEOUT)
        .await
        .context(error::NoTokenSnafu)?;
    Ok(token.trim().to_string())
}

/// The token of the user currently logged in with `oc`.
pub async fn oc_whoami_token() -> Result<String> {
    let command = "oc whoami -t";
    let output = command_killed_on_drop("oc")
        .arg("whoami")
        .arg("-t")
        .output()
        .await
        .context(error::CommandStartSnafu { command })?;
    ensure!(
        output.status.success(),
        error::CommandFailedSnafu {
            command,
            code: output.status.code().unwrap_or(1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    );
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    ensure!(!token.is_empty(), error::NoTokenSnafu);
    Ok(token)
}

/// A `Command` whose child is killed when the future waiting on it is dropped, so a command
/// abandoned by `first_available` does not outlive its timeout.
fn command_killed_on_drop(program: &str) -> Command {
    let mut command = Command::new(program);
    command.kill_on_drop(true);
    command
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn configured_token_wins() {
        let token = resolve_bearer_token(Some(" sha256~abc \n".to_string()))
            .await
            .unwrap();
        assert_eq!(token, "sha256~abc");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_command_is_killed() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("finished");
        let script = format!("sleep 1 && touch '{}'", marker.display());
        let candidates = vec![Candidate::new("slow command", async move {
            command_killed_on_drop("sh")
                .arg("-c")
                .arg(&script)
                .output()
                .await
                .ok()
                .map(|_| ())
        })];
        assert!(first_available(candidates, Duration::from_millis(100))
            .await
            .is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!marker.exists());
    }
}
