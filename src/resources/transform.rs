//! Resource copier and quota augmenter.
//!
//! Turns a user-declared `ResourceRequirements` override into the canonical
//! `Resources` values of a component, and for cache-holding components adds
//! the memory-tier quota on top of the memory limit.
//!
//! ## Invariants
//!
//! - An absent or empty override map never produces an output map.
//! - Siblings in a pair always receive identical values.
//! - Augmentation only touches `memory`.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as K8sQuantity;
use tracing::{debug, info};

use crate::controller::config::EngineConfig;
use crate::controller::error::Result;
use crate::controller::runtime_info::RuntimeInfo;
use crate::crd::MediumType;
use crate::resources::quantity::Quantity;
use crate::resources::values::{ResourceList, ResourceName, Resources};

/// Output targets of one transformation: a component and, for the master and
/// worker, its job sibling.
#[derive(Debug)]
pub struct ComponentResourcePair<'a> {
    component: &'static str,
    primary: &'a mut Resources,
    sibling: Option<&'a mut Resources>,
}

impl<'a> ComponentResourcePair<'a> {
    /// Two siblings that always share the same resources.
    pub fn pair(
        component: &'static str,
        primary: &'a mut Resources,
        sibling: &'a mut Resources,
    ) -> Self {
        Self {
            component,
            primary,
            sibling: Some(sibling),
        }
    }

    /// A component without a sibling, such as Fuse.
    pub fn single(component: &'static str, target: &'a mut Resources) -> Self {
        Self {
            component,
            primary: target,
            sibling: None,
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    fn targets_mut(&mut self) -> impl Iterator<Item = &mut Resources> {
        std::iter::once(&mut *self.primary).chain(self.sibling.as_deref_mut())
    }
}

/// Copy an override into every target of `pair`, unmodified apart from
/// canonical quantity formatting.
pub fn copy_resources(
    source: &ResourceRequirements,
    pair: &mut ComponentResourcePair<'_>,
) -> Result<()> {
    let requests = to_resource_list(source.requests.as_ref())?;
    let limits = to_resource_list(source.limits.as_ref())?;

    if requests.is_none() && limits.is_none() {
        debug!(component = pair.component, "No resource override, skipping copy");
        return Ok(());
    }

    for target in pair.targets_mut() {
        if let Some(requests) = &requests {
            target.requests = Some(requests.clone());
        }
        if let Some(limits) = &limits {
            target.limits = Some(limits.clone());
        }
    }

    Ok(())
}

/// Copy an override, then grow the memory limit by the memory-tier quota.
///
/// A missing memory limit is treated as zero, so a memory tier always yields
/// a concrete limit. With `augment_memory_request` set, the memory request is
/// grown the same way.
pub fn augment_resources(
    source: &ResourceRequirements,
    sizing: &RuntimeInfo,
    pair: &mut ComponentResourcePair<'_>,
    config: &EngineConfig,
) -> Result<()> {
    copy_resources(source, pair)?;

    let mem_quota = sizing.total_quota_for_medium(MediumType::Memory);
    if mem_quota.is_zero() {
        debug!(
            component = pair.component,
            runtime = %sizing.key(),
            "No memory tier quota, keeping resources as declared"
        );
        return Ok(());
    }

    let component = pair.component;
    for target in pair.targets_mut() {
        let limit = add_memory(&mut target.limits, &mem_quota)?;
        if config.augment_memory_request {
            add_memory(&mut target.requests, &mem_quota)?;
        }
        info!(
            component,
            runtime = %sizing.key(),
            quota = %mem_quota,
            memory_limit = %limit,
            "Added memory tier quota to memory limit"
        );
    }

    Ok(())
}

/// Canonicalize an override map. Absent and empty maps both map to `None`.
fn to_resource_list(
    source: Option<&BTreeMap<String, K8sQuantity>>,
) -> Result<Option<ResourceList>> {
    let Some(source) = source.filter(|list| !list.is_empty()) else {
        return Ok(None);
    };

    let mut list = ResourceList::new();
    for (name, quantity) in source {
        let canonical = Quantity::try_from(quantity)?.to_string();
        list.insert(ResourceName::from(name.as_str()), canonical);
    }
    Ok(Some(list))
}

/// Add `quota` to the memory entry of `list`, creating both if missing.
/// Returns the new canonical value.
fn add_memory(list: &mut Option<ResourceList>, quota: &Quantity) -> Result<String> {
    let list = list.get_or_insert_with(ResourceList::new);
    let updated = match list.get(&ResourceName::Memory) {
        Some(existing) => existing.parse::<Quantity>()?.checked_add(quota)?,
        None => *quota,
    };
    let rendered = updated.to_string();
    list.insert(ResourceName::Memory, rendered.clone());
    Ok(rendered)
}
