//! Values whose JSON shape changed between Marathon releases.
//!
//! Older servers wrap these strings in a single-field object, newer ones send
//! the bare string:
//!
//! ```json
//! "instanceId": {"idString": "web.instance-dc6cfe60"}   "condition": {"str": "running"}
//! "instanceId": "web.instance-dc6cfe60"                 "condition": "running"
//! ```
//!
//! Both decode to the same value. Encoding always produces the bare string.
//! A wire `null`, or a wrapper object without its field, decodes to the empty
//! value.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Identifier of one pod instance, e.g. `web.instance-dc6cfe60-6812-11e7-a18e-70b3d5800003`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PodInstanceId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum PodInstanceIdRepr {
    Wrapped {
        #[serde(rename = "idString", default)]
        id_string: Option<String>,
    },
    Bare(Option<String>),
}

impl<'de> Deserialize<'de> for PodInstanceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PodInstanceIdRepr::deserialize(deserializer) {
            Ok(PodInstanceIdRepr::Wrapped { id_string }) => Ok(Self(id_string.unwrap_or_default())),
            Ok(PodInstanceIdRepr::Bare(id)) => Ok(Self(id.unwrap_or_default())),
            Err(_) => Err(de::Error::custom(
                "malformed value at `instanceId`: expected a string or {\"idString\": string}",
            )),
        }
    }
}

impl PodInstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PodInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PodInstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for PodInstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PodInstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for PodInstanceId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PodInstanceId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Condition of a pod instance or one of its tasks (`running`, `finished`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskCondition(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskConditionRepr {
    Wrapped {
        #[serde(rename = "str", default)]
        value: Option<String>,
    },
    Bare(Option<String>),
}

impl<'de> Deserialize<'de> for TaskCondition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match TaskConditionRepr::deserialize(deserializer) {
            Ok(TaskConditionRepr::Wrapped { value }) => Ok(Self(value.unwrap_or_default())),
            Ok(TaskConditionRepr::Bare(condition)) => Ok(Self(condition.unwrap_or_default())),
            Err(_) => Err(de::Error::custom(
                "malformed value at `condition`: expected a string or {\"str\": string}",
            )),
        }
    }
}

impl TaskCondition {
    pub fn new(condition: impl Into<String>) -> Self {
        Self(condition.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison.
    pub fn is(&self, condition: &str) -> bool {
        self.0.eq_ignore_ascii_case(condition)
    }
}

impl fmt::Display for TaskCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskCondition {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskCondition {
    fn from(condition: &str) -> Self {
        Self(condition.to_string())
    }
}

impl PartialEq<&str> for TaskCondition {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
