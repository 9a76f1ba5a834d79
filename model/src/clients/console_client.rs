use crate::clients::error::{self, Result};
use crate::clients::StatusCode;
use crate::constants::{CONSOLE_VERSION_PATH, CSRF_COOKIE, CSRF_HEADER};
use crate::probe::{backoff_probe, ProbeOutcome, RetryConfig};
use crate::tracker::DeleteExecutor;
use log::{debug, trace};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::RequestBuilder;
use serde::Deserialize;
use snafu::ResultExt;
use std::path::Path;

/// The credentials of a logged-in console user: session cookies, the anti-forgery token and,
/// optionally, a bearer token.
#[derive(Clone, Default)]
pub struct ConsoleSession {
    cookies: Vec<(String, String)>,
    csrf_token: Option<String>,
    bearer_token: Option<String>,
}

/// The subset of a browser storage-state file that carries the session.
#[derive(Deserialize)]
struct StorageState {
    #[serde(default)]
    cookies: Vec<StorageCookie>,
}

#[derive(Deserialize)]
struct StorageCookie {
    name: String,
    value: String,
}

impl ConsoleSession {
    /// Load the cookies saved by the browser login step.
    pub fn from_storage_state<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).context(error::FileSnafu { path })?;
        let state: StorageState =
            serde_json::from_str(&data).context(error::SerdeSnafu { path })?;
        Ok(Self {
            cookies: state
                .cookies
                .into_iter()
                .map(|cookie| (cookie.name, cookie.value))
                .collect(),
            ..Self::default()
        })
    }

    pub fn with_cookie<S1, S2>(mut self, name: S1, value: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn with_csrf_token<S>(mut self, token: S) -> Self
    where
        S: Into<String>,
    {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn with_bearer_token<S>(mut self, token: S) -> Self
    where
        S: Into<String>,
    {
        self.bearer_token = Some(token.into());
        self
    }

    /// The anti-forgery token. An explicit token wins over the `csrf-token` cookie.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref().or_else(|| {
            self.cookies
                .iter()
                .find(|(name, _)| name == CSRF_COOKIE)
                .map(|(_, value)| value.as_str())
        })
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

// Session values are credentials, only their presence is shown.
impl std::fmt::Debug for ConsoleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSession")
            .field(
                "cookies",
                &self.cookies.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("csrf_token", &self.csrf_token().is_some())
            .field("bearer_token", &self.bearer_token.is_some())
            .finish()
    }
}

/// A client for the console's Kubernetes proxy. Requests carry the session the same way the
/// browser does, so the console applies the logged-in user's permissions.
#[derive(Clone, Debug)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: String,
    session: ConsoleSession,
}

impl ConsoleClient {
    pub fn new<S>(base_url: S, session: ConsoleSession) -> Result<Self>
    where
        S: Into<String>,
    {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context(error::HttpClientSnafu)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, self.session.csrf_token().unwrap_or_default());
        if let Some(cookies) = self.session.cookie_header() {
            request = request.header(COOKIE, cookies);
        }
        if let Some(token) = &self.session.bearer_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Send a `DELETE` for `path` and return the response status.
    pub async fn delete_path(&self, path: &str) -> Result<StatusCode> {
        let url = self.url(path);
        trace!("DELETE {}", url);
        let response = self
            .authorize(self.http.delete(&url))
            .send()
            .await
            .context(error::RequestSnafu {
                method: "DELETE",
                url: &url,
            })?;
        Ok(response.status())
    }

    /// Wait until the console proxies Kubernetes requests for this session. Server errors and
    /// connection failures are retried; an unauthorized session fails right away.
    pub async fn wait_until_ready(&self, config: &RetryConfig) -> Result<()> {
        let url = self.url(CONSOLE_VERSION_PATH);
        let version_url = url.as_str();
        backoff_probe(config, "console session", move || async move {
            match self.authorize(self.http.get(version_url)).send().await {
                Ok(response) => classify_readiness(response.status()),
                Err(e) => ProbeOutcome::NeedsRetry(e.to_string()),
            }
        })
        .await
        .context(error::NotReadySnafu { url: &url })?;
        debug!("Console at '{}' is ready", self.base_url);
        Ok(())
    }
}

fn classify_readiness(status: StatusCode) -> ProbeOutcome<()> {
    if status.is_success() {
        ProbeOutcome::Ready(())
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ProbeOutcome::Failed(format!("the session was rejected with {}", status))
    } else {
        ProbeOutcome::NeedsRetry(format!("responded with {}", status))
    }
}

#[async_trait::async_trait]
impl DeleteExecutor for ConsoleClient {
    type E = crate::clients::Error;

    async fn delete(&self, path: &str) -> std::result::Result<StatusCode, Self::E> {
        self.delete_path(path).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn csrf_token_from_cookie() {
        let session = ConsoleSession::default()
            .with_cookie("openshift-session-token", "abc")
            .with_cookie("csrf-token", "xyz");
        assert_eq!(session.csrf_token(), Some("xyz"));
        assert_eq!(
            session.cookie_header().unwrap(),
            "openshift-session-token=abc; csrf-token=xyz"
        );
        let session = session.with_csrf_token("explicit");
        assert_eq!(session.csrf_token(), Some("explicit"));
    }

    #[test]
    fn storage_state_cookies() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("user.json");
        std::fs::write(
            &path,
            r#"{
                "cookies": [
                    {"name": "openshift-session-token", "value": "abc", "domain": "console", "path": "/"},
                    {"name": "csrf-token", "value": "xyz", "domain": "console", "path": "/"}
                ],
                "origins": []
            }"#,
        )
        .unwrap();
        let session = ConsoleSession::from_storage_state(&path).unwrap();
        assert_eq!(session.csrf_token(), Some("xyz"));
        assert!(!format!("{:?}", session).contains("abc"));
    }

    #[test]
    fn readiness_classification() {
        assert_eq!(classify_readiness(StatusCode::OK), ProbeOutcome::Ready(()));
        assert!(matches!(
            classify_readiness(StatusCode::UNAUTHORIZED),
            ProbeOutcome::Failed(_)
        ));
        assert!(matches!(
            classify_readiness(StatusCode::BAD_GATEWAY),
            ProbeOutcome::NeedsRetry(_)
        ));
    }
}
