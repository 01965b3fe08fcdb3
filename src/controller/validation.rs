//! Validation logic for GooseFSRuntime specs.
//!
//! This module checks the parts of the spec the resource transformation
//! depends on:
//! - Tiered store quotas and watermarks
//! - Job master / job worker resources matching their primary component

use k8s_openapi::api::core::v1::ResourceRequirements;
use tracing::warn;

use crate::controller::error::{Error, Result};
use crate::controller::runtime_info::level_quota;
use crate::crd::{GooseFSRuntime, MediumType, TieredStore};

/// Validate the runtime spec
pub fn validate_spec(runtime: &GooseFSRuntime) -> Result<()> {
    validate_tiered_store(&runtime.spec.tiered_store)?;
    validate_sibling_resources(
        "jobMaster",
        &runtime.spec.master.resources,
        &runtime.spec.job_master.resources,
    )?;
    validate_sibling_resources(
        "jobWorker",
        &runtime.spec.worker.resources,
        &runtime.spec.job_worker.resources,
    )?;
    warn_unbounded_worker_memory(runtime);
    Ok(())
}

/// Validate quotas and watermarks of every level
fn validate_tiered_store(tiered_store: &TieredStore) -> Result<()> {
    for (index, level) in tiered_store.levels.iter().enumerate() {
        let quota = level_quota(level)?;
        if quota.as_nanos() < 0 {
            return Err(Error::Validation(format!(
                "tieredstore level {} has negative quota {}",
                index, quota
            )));
        }

        let high = parse_watermark(index, "high", level.high.as_deref())?;
        let low = parse_watermark(index, "low", level.low.as_deref())?;
        if let (Some(high), Some(low)) = (high, low)
            && low > high
        {
            return Err(Error::Validation(format!(
                "tieredstore level {} low watermark {} exceeds high watermark {}",
                index, low, high
            )));
        }
    }
    Ok(())
}

fn parse_watermark(index: usize, field: &str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: f64 = raw.trim().parse().map_err(|_| {
        Error::Validation(format!(
            "tieredstore level {} {} watermark {:?} is not a number",
            index, field, raw
        ))
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::Validation(format!(
            "tieredstore level {} {} watermark {} must be between 0 and 1",
            index, field, value
        )));
    }
    Ok(Some(value))
}

/// A job sibling either leaves resources unset or repeats the primary's
fn validate_sibling_resources(
    sibling: &str,
    primary: &ResourceRequirements,
    declared: &ResourceRequirements,
) -> Result<()> {
    if is_unset(declared) || normalized(declared) == normalized(primary) {
        return Ok(());
    }
    Err(Error::Validation(format!(
        "{} resources must match its primary component or be left unset",
        sibling
    )))
}

fn is_unset(resources: &ResourceRequirements) -> bool {
    resources.requests.as_ref().is_none_or(|r| r.is_empty())
        && resources.limits.as_ref().is_none_or(|l| l.is_empty())
}

/// Treat an empty map the same as an absent one
fn normalized(resources: &ResourceRequirements) -> ResourceRequirements {
    ResourceRequirements {
        requests: resources.requests.clone().filter(|r| !r.is_empty()),
        limits: resources.limits.clone().filter(|l| !l.is_empty()),
        ..Default::default()
    }
}

/// Workers with a memory tier but no memory limit end up capped at the
/// cache quota alone
fn warn_unbounded_worker_memory(runtime: &GooseFSRuntime) {
    let has_memory_tier = runtime
        .spec
        .tiered_store
        .levels
        .iter()
        .any(|level| level.medium_type == MediumType::Memory);
    let has_memory_limit = runtime
        .spec
        .worker
        .resources
        .limits
        .as_ref()
        .is_some_and(|limits| limits.contains_key("memory"));

    if has_memory_tier && !has_memory_limit {
        warn!(
            runtime = %runtime.metadata.name.as_deref().unwrap_or_default(),
            "Worker has no memory limit; limit will equal the memory tier quota"
        );
    }
}
