//! Run specifications embedded in queue items.
//!
//! Apart from `id`, every field the server sends is kept verbatim in `extra`
//! and written back out on serialization, so an explicit `null` survives a
//! round trip. The accessors read the commonly inspected fields out of it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single-container application definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Application {
    pub fn cmd(&self) -> Option<&str> {
        self.extra.get("cmd").and_then(Value::as_str)
    }

    /// Requested instance count.
    pub fn instances(&self) -> Option<u32> {
        self.extra
            .get("instances")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }

    pub fn cpus(&self) -> Option<f64> {
        self.extra.get("cpus").and_then(Value::as_f64)
    }

    /// Memory in MiB.
    pub fn mem(&self) -> Option<f64> {
        self.extra.get("mem").and_then(Value::as_f64)
    }

    pub fn version(&self) -> Option<&str> {
        self.extra.get("version").and_then(Value::as_str)
    }
}

/// A multi-container pod definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pod {
    pub fn version(&self) -> Option<&str> {
        self.extra.get("version").and_then(Value::as_str)
    }

    /// Names of the pod's containers, in definition order.
    pub fn container_names(&self) -> Vec<&str> {
        self.extra
            .get("containers")
            .and_then(Value::as_array)
            .map(|containers| {
                containers
                    .iter()
                    .filter_map(|c| c.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}
