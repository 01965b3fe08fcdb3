//! GooseFS resource transformation engine.
//!
//! Entry points called once per component during the spec transformation of
//! a `GooseFSRuntime`. The engine holds no mutable state: each call reads the
//! runtime and writes into the exclusively borrowed values.

use kube::ResourceExt;
use tracing::debug;

use crate::controller::config::EngineConfig;
use crate::controller::error::{Error, Result};
use crate::controller::runtime_info::RuntimeInfo;
use crate::controller::validation::validate_spec;
use crate::crd::{GOOSEFS_RUNTIME, GooseFSRuntime};
use crate::resources::transform::{ComponentResourcePair, augment_resources, copy_resources};
use crate::resources::values::GooseFsValues;

/// Transformation engine for one GooseFS runtime.
#[derive(Clone, Debug)]
pub struct GooseFsEngine {
    name: String,
    namespace: String,
    config: EngineConfig,
    runtime_info: Option<RuntimeInfo>,
}

impl GooseFsEngine {
    /// Create an engine without runtime info.
    ///
    /// Worker and Fuse transforms fail until runtime info is attached.
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        config: EngineConfig,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            config,
            runtime_info: None,
        }
    }

    /// Create an engine for `runtime`, building its runtime info from the
    /// declared tiered store.
    pub fn for_runtime(runtime: &GooseFSRuntime, config: EngineConfig) -> Result<Self> {
        let name = runtime.name_any();
        let namespace = runtime.namespace().unwrap_or_default();
        let runtime_info = RuntimeInfo::build(
            &name,
            &namespace,
            GOOSEFS_RUNTIME,
            &runtime.spec.tiered_store,
        )?;
        Ok(Self::new(name, namespace, config).with_runtime_info(runtime_info))
    }

    /// Attach runtime info.
    pub fn with_runtime_info(mut self, runtime_info: RuntimeInfo) -> Self {
        self.runtime_info = Some(runtime_info);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runtime info, or `MissingRuntimeInfo` if none was attached.
    pub fn runtime_info(&self) -> Result<&RuntimeInfo> {
        self.runtime_info
            .as_ref()
            .ok_or_else(|| Error::MissingRuntimeInfo(self.key()))
    }

    /// Validate `runtime` and build the complete values for it.
    pub fn transform(&self, runtime: &GooseFSRuntime) -> Result<GooseFsValues> {
        let mut values = GooseFsValues {
            properties: runtime.spec.properties.clone(),
            ..Default::default()
        };
        self.transform_resources(runtime, &mut values)?;
        Ok(values)
    }

    /// Run the master, worker and Fuse transforms in order.
    pub fn transform_resources(
        &self,
        runtime: &GooseFSRuntime,
        values: &mut GooseFsValues,
    ) -> Result<()> {
        validate_spec(runtime)?;
        self.transform_resources_for_master(runtime, values)?;
        self.transform_resources_for_worker(runtime, values)?;
        self.transform_resources_for_fuse(runtime, values)?;
        Ok(())
    }

    /// Master and job master receive the master's override unchanged.
    pub fn transform_resources_for_master(
        &self,
        runtime: &GooseFSRuntime,
        values: &mut GooseFsValues,
    ) -> Result<()> {
        debug!(runtime = %self.key(), "Transforming master resources");
        let mut pair = ComponentResourcePair::pair(
            "master",
            &mut values.master.resources,
            &mut values.job_master.resources,
        );
        copy_resources(&runtime.spec.master.resources, &mut pair)
    }

    /// Worker and job worker receive the worker's override plus the memory
    /// tier quota on the memory limit.
    pub fn transform_resources_for_worker(
        &self,
        runtime: &GooseFSRuntime,
        values: &mut GooseFsValues,
    ) -> Result<()> {
        debug!(runtime = %self.key(), "Transforming worker resources");
        let runtime_info = self.runtime_info()?;
        let mut pair = ComponentResourcePair::pair(
            "worker",
            &mut values.worker.resources,
            &mut values.job_worker.resources,
        );
        augment_resources(
            &runtime.spec.worker.resources,
            runtime_info,
            &mut pair,
            &self.config,
        )
    }

    /// Fuse receives its override plus the memory tier quota on the memory
    /// limit, independently of the workers.
    pub fn transform_resources_for_fuse(
        &self,
        runtime: &GooseFSRuntime,
        values: &mut GooseFsValues,
    ) -> Result<()> {
        debug!(runtime = %self.key(), "Transforming fuse resources");
        let runtime_info = self.runtime_info()?;
        let mut target = ComponentResourcePair::single("fuse", &mut values.fuse.resources);
        augment_resources(
            &runtime.spec.fuse.resources,
            runtime_info,
            &mut target,
            &self.config,
        )
    }

    fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}
