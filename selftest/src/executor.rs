use model::clients::StatusCode;
use model::DeleteExecutor;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// The scripted answer to a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Status(StatusCode),
    /// The request never got a response.
    TransportError(String),
}

/// A [`DeleteExecutor`] that answers from a script keyed by resource name, i.e. the last segment
/// of the delete path. Unscripted names get `200 OK`.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    replies: HashMap<String, Reply>,
    latency: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply<S>(mut self, resource_name: S, reply: Reply) -> Self
    where
        S: Into<String>,
    {
        self.replies.insert(resource_name.into(), reply);
        self
    }

    pub fn status<S>(self, resource_name: S, status: StatusCode) -> Self
    where
        S: Into<String>,
    {
        self.reply(resource_name, Reply::Status(status))
    }

    /// Every request waits `latency` before it is answered.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The paths that were deleted, in the order the requests were issued.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }

    /// The largest number of requests that were waiting for a reply at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DeleteExecutor for ScriptedExecutor {
    type E = String;

    async fn delete(&self, path: &str) -> Result<StatusCode, Self::E> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(path.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let name = path.rsplit('/').next().unwrap_or(path);
        match self.replies.get(name) {
            None => Ok(StatusCode::OK),
            Some(Reply::Status(status)) => Ok(*status),
            Some(Reply::TransportError(message)) => Err(message.clone()),
        }
    }
}
