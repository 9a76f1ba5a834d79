use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
pub struct Error(OpaqueError);
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum OpaqueError {
    #[snafu(display("Unable to read '{}': {}", path.display(), source))]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Error deserializing '{}': {}", path.display(), source))]
    ConfigDeserialization {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Error reading harness settings from the environment: {}", source))]
    Environment { source: envy::Error },

    #[snafu(display("Provider configuration not found for key: {}", key))]
    ProviderNotFound { key: String },
}

impl Error {
    /// Returns `true` when a lookup failed because the requested entry does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.0, OpaqueError::ProviderNotFound { .. })
    }
}
