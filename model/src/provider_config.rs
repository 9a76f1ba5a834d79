use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::path::Path;

/// The kind of source platform a provider connects to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Vsphere,
    Ovirt,
    Ova,
    Openstack,
}

/// Connection details for one source provider, as stored in `.providers.json`.
#[derive(Clone, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    pub hostname: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vddk_init_image: Option<String>,
}

// Keep the password out of logs.
impl Debug for ProviderConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider_type", &self.provider_type)
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("fingerprint", &self.fingerprint)
            .field("vddk_init_image", &self.vddk_init_image)
            .finish()
    }
}

/// The parsed provider table. It is loaded once by the caller and handed to whatever needs it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProviderTable {
    providers: BTreeMap<String, ProviderConfig>,
}

impl ProviderTable {
    /// Read and parse a provider table file.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).context(error::ConfigReadSnafu { path })?;
        Ok(serde_json::from_str(&data).context(error::ConfigDeserializationSnafu { path })?)
    }

    pub fn get(&self, key: &str) -> Result<&ProviderConfig> {
        Ok(self
            .providers
            .get(key)
            .context(error::ProviderNotFoundSnafu { key })?)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl FromIterator<(String, ProviderConfig)> for ProviderTable {
    fn from_iter<I: IntoIterator<Item = (String, ProviderConfig)>>(iter: I) -> Self {
        Self {
            providers: iter.into_iter().collect(),
        }
    }
}
