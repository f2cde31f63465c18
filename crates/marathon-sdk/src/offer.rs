//! Resource offers as reported in the launch queue.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One offer made by a Mesos agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub agent_id: String,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<OfferResources>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attributes>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offer {
    pub fn resources(&self) -> &[OfferResources] {
        self.resources.as_deref().unwrap_or_default()
    }

    pub fn attributes(&self) -> &[Attributes] {
        self.attributes.as_deref().unwrap_or_default()
    }

    pub fn resource(&self, name: &str) -> Option<&OfferResources> {
        self.resources().iter().find(|r| r.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attributes> {
        self.attributes().iter().find(|a| a.name == name)
    }
}

/// A named resource (`cpus`, `mem`, `ports`, ...) in an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferResources {
    pub name: String,
    pub scalar: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<Vec<Range>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OfferResources {
    pub fn ranges(&self) -> &[Range] {
        self.ranges.as_deref().unwrap_or_default()
    }

    pub fn set(&self) -> &[String] {
        self.set.as_deref().unwrap_or_default()
    }
}

/// An agent attribute carried by an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub name: String,
    pub scalar: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<Vec<Range>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attributes {
    pub fn ranges(&self) -> &[Range] {
        self.ranges.as_deref().unwrap_or_default()
    }

    pub fn set(&self) -> &[String] {
        self.set.as_deref().unwrap_or_default()
    }
}

/// Inclusive range, e.g. of ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub begin: u64,
    pub end: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Range {
    pub fn contains(&self, value: u64) -> bool {
        (self.begin..=self.end).contains(&value)
    }
}
