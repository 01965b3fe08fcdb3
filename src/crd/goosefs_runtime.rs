//! GooseFSRuntime Custom Resource Definition.
//!
//! Declares the per-component resource overrides and the tiered-store layout
//! of a GooseFS cache runtime. Only the fields consumed by the resource
//! transformation are modelled here.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Runtime type name used when building runtime info.
pub const GOOSEFS_RUNTIME: &str = "goosefs";

/// GooseFSRuntime describes a GooseFS cache runtime bound to a dataset.
///
/// Example:
/// ```yaml
/// apiVersion: data.fluid.io/v1alpha1
/// kind: GooseFSRuntime
/// metadata:
///   name: hbase
/// spec:
///   replicas: 2
///   tieredstore:
///     levels:
///       - mediumtype: MEM
///         path: /dev/shm
///         quota: 20Gi
///   worker:
///     resources:
///       limits:
///         memory: 2Gi
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "data.fluid.io",
    version = "v1alpha1",
    kind = "GooseFSRuntime",
    plural = "goosefsruntimes",
    shortname = "goosefs",
    namespaced,
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GooseFSRuntimeSpec {
    /// Desired number of workers.
    #[serde(default)]
    pub replicas: i32,

    /// GooseFS master.
    #[serde(default)]
    pub master: GooseFSCompTemplateSpec,

    /// GooseFS job master. Shares the master's resources.
    #[serde(default)]
    pub job_master: GooseFSCompTemplateSpec,

    /// GooseFS worker.
    #[serde(default)]
    pub worker: GooseFSCompTemplateSpec,

    /// GooseFS job worker. Shares the worker's resources.
    #[serde(default)]
    pub job_worker: GooseFSCompTemplateSpec,

    /// Client-side Fuse mount process.
    #[serde(default)]
    pub fuse: GooseFSFuseSpec,

    /// Cache tiers used by workers.
    #[serde(default, rename = "tieredstore")]
    pub tiered_store: TieredStore,

    /// Site properties applied to every component.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Template for a master, job master, worker or job worker.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GooseFSCompTemplateSpec {
    /// Resource requests and limits for the component container.
    #[serde(default)]
    pub resources: ResourceRequirements,

    /// Component-specific site properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Template for the Fuse mount process.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GooseFSFuseSpec {
    /// Resource requests and limits for the Fuse container.
    #[serde(default)]
    pub resources: ResourceRequirements,

    /// Fuse-specific site properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// Extra arguments for the Fuse process.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Ordered cache tiers, fastest first.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TieredStore {
    #[serde(default)]
    pub levels: Vec<Level>,
}

/// One cache tier.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Backing medium of the tier.
    #[serde(rename = "mediumtype")]
    pub medium_type: MediumType,

    /// Comma-separated mount paths, e.g. `/mnt/cache1,/mnt/cache2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Capacity of the tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<Quantity>,

    /// Comma-separated capacities, one per path, e.g. `1Gi,2Gi`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_list: Option<String>,

    /// High watermark ratio, e.g. "0.95".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,

    /// Low watermark ratio, e.g. "0.7".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<String>,
}

/// Backing medium of a cache tier.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum MediumType {
    #[default]
    #[serde(rename = "MEM")]
    Memory,
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
}

impl fmt::Display for MediumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumType::Memory => write!(f, "MEM"),
            MediumType::Ssd => write!(f, "SSD"),
            MediumType::Hdd => write!(f, "HDD"),
        }
    }
}
