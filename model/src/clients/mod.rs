mod cluster_client;
mod console_client;
mod error;
mod http_status_code;
mod inventory_client;
mod token;

pub use cluster_client::ClusterClient;
pub use console_client::{ConsoleClient, ConsoleSession};
pub use error::{Error, Result};
pub use http_status_code::{AllowNotFound, HttpStatusCode, StatusCode};
pub use inventory_client::InventoryClient;
pub use token::{oc_whoami_token, resolve_bearer_token};
