//! The launch queue: `/v2/queue`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::offer::Offer;
use crate::run_spec::{Application, Pod};
use crate::{trim_root_path, MarathonClient, Result, API_QUEUE};

/// Response of `GET /v2/queue`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Queue {
    #[serde(rename = "queue", default)]
    pub items: Vec<QueueItem>,
}

impl Queue {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items currently held back by a launch delay.
    pub fn delayed(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.iter().filter(|item| item.delay.is_active())
    }

    /// The item for the application or pod with the given id, if queued.
    pub fn find(&self, id: &str) -> Option<&QueueItem> {
        let id = trim_root_path(id);
        self.items.iter().find(|item| {
            item.run_spec()
                .is_some_and(|spec| trim_root_path(spec.id()) == id)
        })
    }
}

/// One pending launch of an application or a pod.
///
/// At most one of `application` and `pod` is set; use [`QueueItem::run_spec`]
/// rather than inspecting both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Instances still to be placed.
    pub count: u32,
    pub delay: Delay,
    pub since: DateTime<Utc>,
    #[serde(rename = "app", default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<Pod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_offers_summary: Option<ProcessedOffersSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_unused_offers: Option<Vec<UnusedOffer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Borrowed view of whatever a [`QueueItem`] is launching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueuedRunSpec<'a> {
    Application(&'a Application),
    Pod(&'a Pod),
}

impl<'a> QueuedRunSpec<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            QueuedRunSpec::Application(app) => &app.id,
            QueuedRunSpec::Pod(pod) => &pod.id,
        }
    }
}

impl QueueItem {
    pub fn run_spec(&self) -> Option<QueuedRunSpec<'_>> {
        match (&self.application, &self.pod) {
            (Some(app), _) => Some(QueuedRunSpec::Application(app)),
            (None, Some(pod)) => Some(QueuedRunSpec::Pod(pod)),
            (None, None) => None,
        }
    }
}

/// Backoff applied before the next launch attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delay {
    pub time_left_seconds: u64,
    pub overdue: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Delay {
    /// `true` while the launch is still waiting for its backoff to expire.
    pub fn is_active(&self) -> bool {
        !self.overdue && self.time_left_seconds > 0
    }
}

/// How the offers seen for a queued launch were used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedOffersSummary {
    pub processed_offers_count: u64,
    pub unused_offers_count: u64,
    /// `None` if no offer has ever been declined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_unused_offer_at: Option<DateTime<Utc>>,
    /// `None` if no offer has ever been used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_offer_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_summary_last_offers: Option<Vec<DeclinedOfferStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_summary_launch_attempt: Option<Vec<DeclinedOfferStep>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Offers declined for one reason within a reporting window.
///
/// `declined <= processed` normally holds but is not guaranteed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclinedOfferStep {
    pub reason: String,
    pub declined: u64,
    pub processed: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An offer the scheduler did not use for this launch, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusedOffer {
    pub offer: Offer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UnusedOffer {
    pub fn reasons(&self) -> &[String] {
        self.reason.as_deref().unwrap_or_default()
    }
}

impl MarathonClient {
    /// Fetch the complete launch queue.
    pub async fn queue(&self) -> Result<Queue> {
        let queue: Queue = self.api_get(API_QUEUE, &[]).await?;
        debug!(items = queue.len(), "fetched launch queue");
        Ok(queue)
    }

    /// Fetch the launch queue with `lastUnusedOffers` embedded in each item.
    pub async fn queue_with_unused_offers(&self) -> Result<Queue> {
        self.api_get(API_QUEUE, &[("embed", "lastUnusedOffers")])
            .await
    }

    /// Reset the launch delay of an application so the next attempt happens
    /// immediately.
    ///
    /// # Arguments
    ///
    /// * `app_id` - Application id, with or without the leading `/`
    pub async fn clear_queue_delay(&self, app_id: &str) -> Result<()> {
        let path = format!("{}/{}/delay", API_QUEUE, trim_root_path(app_id));
        self.api_delete_discard::<()>(&path, None).await
    }
}
