use crate::clients::{HttpStatusCode, StatusCode};
use crate::probe;
use snafu::Snafu;
use std::path::PathBuf;

/// The `Result` type returned by `clients`.
pub type Result<T> = std::result::Result<T, Error>;

/// The public error type returned by `clients`.
#[derive(Debug, Snafu)]
pub struct Error(InnerError);

/// The private error type returned by `clients`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub(crate) enum InnerError {
    #[snafu(display("Error initializing the Kubernetes client: {}", source))]
    Initialization { source: kube::Error },

    #[snafu(display("Unable to read kubeconfig: {}", source))]
    KubeconfigRead {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to {} {}: {}", method, what, source))]
    KubeApiCall {
        method: String,
        what: String,
        source: kube::Error,
    },

    #[snafu(display("Unable to build the HTTP client: {}", source))]
    HttpClient { source: reqwest::Error },

    #[snafu(display("Unable to {} '{}': {}", method, url, source))]
    Request {
        method: String,
        url: String,
        source: reqwest::Error,
    },

    #[snafu(display("'{}' responded with {}", url, status))]
    ResponseStatus { url: String, status: StatusCode },

    #[snafu(display("Unable to parse the response from '{}': {}", url, source))]
    ResponseBody { url: String, source: reqwest::Error },

    #[snafu(display("Unable to read '{}': {}", path.display(), source))]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Error deserializing '{}': {}", path.display(), source))]
    Serde {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Unable to run '{}': {}", command, source))]
    CommandStart {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("'{}' failed with exit status '{}': {}", command, code, stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[snafu(display("No bearer token is available, set CLUSTER_TOKEN or log in with 'oc login'"))]
    NoToken,

    #[snafu(display("The console at '{}' is not ready: {}", url, source))]
    NotReady { url: String, source: probe::Error },
}

impl HttpStatusCode for InnerError {
    fn status_code(&self) -> Option<StatusCode> {
        match self {
            InnerError::KubeApiCall { source: e, .. } => e.status_code(),
            InnerError::Request { source: e, .. } => e.status_code(),
            InnerError::ResponseStatus { status, .. } => Some(*status),
            InnerError::Initialization { .. }
            | InnerError::KubeconfigRead { .. }
            | InnerError::HttpClient { .. }
            | InnerError::ResponseBody { .. }
            | InnerError::File { .. }
            | InnerError::Serde { .. }
            | InnerError::CommandStart { .. }
            | InnerError::CommandFailed { .. }
            | InnerError::NoToken
            | InnerError::NotReady { .. } => None,
        }
    }
}

impl HttpStatusCode for Error {
    fn status_code(&self) -> Option<StatusCode> {
        self.0.status_code()
    }
}
