//! Pod instances as returned when they are killed: `/v2/pods/{id}::instances`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::wire::{PodInstanceId, TaskCondition};
use crate::{pod_instances_uri, MarathonClient, Result};

/// Snapshot of a pod instance taken when it was deleted.
///
/// This is not a live handle; `state.goal` normally reports the instance as
/// stopping or decommissioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodInstance {
    pub instance_id: PodInstanceId,
    pub agent_info: PodAgentInfo,
    #[serde(default)]
    pub tasks_map: HashMap<String, PodTask>,
    pub run_spec_version: DateTime<Utc>,
    pub state: PodInstanceStateHistory,
    pub unreachable_strategy: UnreachableStrategy,
}

impl PodInstance {
    pub fn task(&self, task_id: &str) -> Option<&PodTask> {
        self.tasks_map.get(task_id)
    }

    /// `(task id, condition)` for every task of the instance.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &TaskCondition)> {
        self.tasks_map
            .iter()
            .map(|(id, task)| (id.as_str(), &task.status.condition))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodInstanceStateHistory {
    pub condition: TaskCondition,
    pub since: DateTime<Utc>,
    /// `None` if the instance never became active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_since: Option<DateTime<Utc>>,
    pub goal: String,
}

/// The agent an instance was placed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodAgentInfo {
    pub host: String,
    pub agent_id: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTask {
    pub task_id: String,
    pub run_spec_version: DateTime<Utc>,
    pub status: PodTaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTaskStatus {
    pub staged_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub mesos_status: String,
    pub condition: TaskCondition,
    #[serde(default)]
    pub network_info: PodNetworkInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodNetworkInfo {
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub host_ports: Vec<u16>,
    #[serde(default)]
    pub ip_addresses: Vec<IpAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAddress {
    pub ip_address: String,
    pub protocol: String,
}

/// What Marathon does with an instance whose agent becomes unreachable.
///
/// On the wire either `{"inactiveAfterSeconds": .., "expungeAfterSeconds": ..}`
/// or the string `"disabled"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UnreachableStrategyRepr", into = "UnreachableStrategyRepr")]
pub enum UnreachableStrategy {
    Enabled {
        inactive_after_seconds: u64,
        expunge_after_seconds: u64,
    },
    Disabled,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum UnreachableStrategyRepr {
    Enabled(EnabledUnreachableStrategy),
    Disabled(DisabledUnreachableStrategy),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnabledUnreachableStrategy {
    inactive_after_seconds: u64,
    expunge_after_seconds: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DisabledUnreachableStrategy {
    Disabled,
}

impl From<UnreachableStrategyRepr> for UnreachableStrategy {
    fn from(repr: UnreachableStrategyRepr) -> Self {
        match repr {
            UnreachableStrategyRepr::Enabled(enabled) => UnreachableStrategy::Enabled {
                inactive_after_seconds: enabled.inactive_after_seconds,
                expunge_after_seconds: enabled.expunge_after_seconds,
            },
            UnreachableStrategyRepr::Disabled(_) => UnreachableStrategy::Disabled,
        }
    }
}

impl From<UnreachableStrategy> for UnreachableStrategyRepr {
    fn from(strategy: UnreachableStrategy) -> Self {
        match strategy {
            UnreachableStrategy::Enabled {
                inactive_after_seconds,
                expunge_after_seconds,
            } => UnreachableStrategyRepr::Enabled(EnabledUnreachableStrategy {
                inactive_after_seconds,
                expunge_after_seconds,
            }),
            UnreachableStrategy::Disabled => {
                UnreachableStrategyRepr::Disabled(DisabledUnreachableStrategy::Disabled)
            }
        }
    }
}

impl MarathonClient {
    /// Kill one instance of a pod.
    ///
    /// Returns the server's snapshot of the instance at deletion time; inspect
    /// its `state` to see what happened.
    ///
    /// # Arguments
    ///
    /// * `pod_id` - Pod id, with or without the leading `/`
    /// * `instance_id` - Full instance id, e.g. `web.instance-dc6cfe60-6812-11e7-a18e-70b3d5800003`
    pub async fn delete_pod_instance(
        &self,
        pod_id: &str,
        instance_id: &str,
    ) -> Result<PodInstance> {
        let path = format!("{}/{}", pod_instances_uri(pod_id), instance_id);
        self.api_delete::<(), _>(&path, None).await
    }

    /// Kill several instances of a pod in one request.
    ///
    /// The order of the returned instances is chosen by the server and need
    /// not match `instance_ids`.
    pub async fn delete_pod_instances<S>(
        &self,
        pod_id: &str,
        instance_ids: &[S],
    ) -> Result<Vec<PodInstance>>
    where
        S: AsRef<str>,
    {
        let ids: Vec<&str> = instance_ids.iter().map(AsRef::as_ref).collect();
        let instances: Vec<PodInstance> = self
            .api_delete(&pod_instances_uri(pod_id), Some(&ids))
            .await?;
        debug!(
            pod_id,
            requested = ids.len(),
            deleted = instances.len(),
            "deleted pod instances"
        );
        Ok(instances)
    }
}
