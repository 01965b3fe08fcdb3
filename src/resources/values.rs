//! Rendered values for the GooseFS component templates.
//!
//! These are the output value objects of the transformation pass. Absent
//! request/limit maps are kept as `None` and skipped on serialization, so the
//! rendered pod template omits the field instead of requesting zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::controller::error::Result;

/// Key of a resource request or limit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceName {
    Cpu,
    Memory,
    /// Any other resource, e.g. `nvidia.com/gpu` or `ephemeral-storage`.
    Other(String),
}

impl ResourceName {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceName::Cpu => "cpu",
            ResourceName::Memory => "memory",
            ResourceName::Other(name) => name,
        }
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        match name {
            "cpu" => ResourceName::Cpu,
            "memory" => ResourceName::Memory,
            other => ResourceName::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResourceName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ResourceName::from(name.as_str()))
    }
}

/// Resource amounts keyed by name, already in canonical string form.
pub type ResourceList = BTreeMap<ResourceName, String>;

/// Requests and limits for one component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
}

impl Resources {
    pub fn request(&self, name: &ResourceName) -> Option<&str> {
        self.requests
            .as_ref()
            .and_then(|list| list.get(name))
            .map(String::as_str)
    }

    pub fn limit(&self, name: &ResourceName) -> Option<&str> {
        self.limits
            .as_ref()
            .and_then(|list| list.get(name))
            .map(String::as_str)
    }

    /// True when neither requests nor limits are present.
    pub fn is_empty(&self) -> bool {
        self.requests.is_none() && self.limits.is_none()
    }
}

/// Values for a single managed component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentValues {
    #[serde(default, skip_serializing_if = "Resources::is_empty")]
    pub resources: Resources,
}

/// Values handed to the template renderer for one GooseFS runtime.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooseFsValues {
    #[serde(default)]
    pub master: ComponentValues,

    #[serde(default)]
    pub job_master: ComponentValues,

    #[serde(default)]
    pub worker: ComponentValues,

    #[serde(default)]
    pub job_worker: ComponentValues,

    #[serde(default)]
    pub fuse: ComponentValues,

    /// GooseFS site properties passed through to the rendered config.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl GooseFsValues {
    /// Serialize to the JSON document consumed by the template renderer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
