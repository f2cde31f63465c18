//! # Marathon Rust SDK
//!
//! A typed client for the parts of the Marathon v2 HTTP API that deal with the
//! launch queue and with pod instances.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marathon_sdk::MarathonClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MarathonClient::new("http://localhost:8080")?;
//!
//!     let queue = client.queue().await?;
//!     for item in &queue.items {
//!         let id = item.run_spec().map(|s| s.id());
//!         println!("{:?} waiting for {} instance(s)", id, item.count);
//!     }
//!
//!     // Reset the backoff of an application that keeps failing to launch
//!     client.clear_queue_delay("/my-app").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | [`MarathonClient::queue`] | GET | `/v2/queue` |
//! | [`MarathonClient::clear_queue_delay`] | DELETE | `/v2/queue/{appId}/delay` |
//! | [`MarathonClient::delete_pod_instance`] | DELETE | `/v2/pods/{podId}::instances/{id}` |
//! | [`MarathonClient::delete_pod_instances`] | DELETE | `/v2/pods/{podId}::instances` |
//!
//! ## Wire compatibility
//!
//! Some values changed shape between Marathon releases. Instance identifiers
//! and task conditions are accepted both as bare strings and as wrapper
//! objects (see [`wire`]). Queue responses decode and re-encode without
//! dropping fields the server added after this crate was written.

pub mod config;
pub mod offer;
pub mod pod_instance;
pub mod queue;
pub mod run_spec;
pub mod wire;

pub use config::MarathonConfig;
pub use offer::{Attributes, Offer, OfferResources, Range};
pub use pod_instance::{
    IpAddress, PodAgentInfo, PodInstance, PodInstanceStateHistory, PodNetworkInfo, PodTask,
    PodTaskStatus, UnreachableStrategy,
};
pub use queue::{
    DeclinedOfferStep, Delay, ProcessedOffersSummary, Queue, QueueItem, QueuedRunSpec,
    UnusedOffer,
};
pub use run_spec::{Application, Pod};
pub use wire::{PodInstanceId, TaskCondition};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Path of the launch queue resource, relative to the API root.
pub const API_QUEUE: &str = "v2/queue";
/// Path of the pods resource, relative to the API root.
pub const API_PODS: &str = "v2/pods";

#[derive(Error, Debug)]
pub enum MarathonError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid Marathon URL: {0}")]
    InvalidUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, MarathonError>;

/// Client for a single Marathon instance.
///
/// Every call is one request/response round trip. Nothing is cached between
/// calls and nothing is retried; errors surface exactly as they occurred.
/// The client is cheap to clone and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct MarathonClient {
    client: Client,
    base_url: String,
}

impl MarathonClient {
    /// Create a client for `base_url` with default timeouts.
    ///
    /// ```rust
    /// use marathon_sdk::MarathonClient;
    ///
    /// let client = MarathonClient::new("http://marathon.mesos:8080/").unwrap();
    /// assert_eq!(client.base_url(), "http://marathon.mesos:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(MarathonConfig::default().with_url(base_url))
    }

    /// Create a client from an explicit configuration.
    pub fn with_config(config: MarathonConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| MarathonError::Client(e.to_string()))?;

        debug!(%base_url, "created Marathon client");
        Ok(Self { client, base_url })
    }

    /// The API root every request path is appended to, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub(crate) async fn api_get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query);
        let body = self.send(Method::GET, path, request).await?;
        decode(path, &body)
    }

    pub(crate) async fn api_delete<B, T>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.delete(path, body).await?;
        decode(path, &body)
    }

    /// DELETE whose response body, if any, is of no interest to the caller.
    pub(crate) async fn api_delete_discard<B>(&self, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.delete(path, body).await.map(|_| ())
    }

    async fn delete<B>(&self, path: &str, body: Option<&B>) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.delete(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(Method::DELETE, path, request).await
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<String> {
        debug!(%method, path, "sending Marathon API request");
        let response = request.header(ACCEPT, "application/json").send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "Marathon API request failed");
            return Err(MarathonError::Api {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            });
        }

        Ok(response.text().await?)
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    let value = serde_json::from_str(body).map_err(|source| MarathonError::Decode {
        path: path.to_string(),
        source,
    })?;
    debug!(path, bytes = body.len(), "decoded Marathon API response");
    Ok(value)
}

/// Marathon reports failures as `{"message": "..."}`; fall back to the raw body.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiErrorBody {
        message: String,
    }

    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string())
}

/// Strip one leading `/` so callers may pass either `/app` or `app`.
pub fn trim_root_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Path of the instance-targeting resource of the pod `pod_id`.
///
/// ```rust
/// use marathon_sdk::pod_instances_uri;
///
/// assert_eq!(pod_instances_uri("/prod/db"), "v2/pods/prod/db::instances");
/// ```
pub fn pod_instances_uri(pod_id: &str) -> String {
    format!("{}/{}::instances", API_PODS, trim_root_path(pod_id))
}
