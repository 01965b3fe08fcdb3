//! Runtime sizing info.
//!
//! Built once per runtime from its tiered store. Aggregates the configured
//! quota of every cache tier by medium so the engine can ask how much cache
//! capacity lives in memory.

use std::collections::BTreeMap;

use tracing::debug;

use crate::controller::error::Result;
use crate::crd::{Level, MediumType, TieredStore};
use crate::resources::quantity::Quantity;

/// Read-only sizing view of one runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeInfo {
    name: String,
    namespace: String,
    runtime_type: String,
    storage: BTreeMap<MediumType, Quantity>,
}

impl RuntimeInfo {
    /// Build runtime info from a tiered store.
    ///
    /// Levels sharing a medium are summed. Fails if any quota is malformed.
    pub fn build(
        name: &str,
        namespace: &str,
        runtime_type: &str,
        tiered_store: &TieredStore,
    ) -> Result<Self> {
        let mut storage: BTreeMap<MediumType, Quantity> = BTreeMap::new();

        for level in &tiered_store.levels {
            let quota = level_quota(level)?;
            let total = storage.entry(level.medium_type).or_default();
            *total = total.checked_add(&quota)?;
        }

        debug!(
            runtime = %format!("{}/{}", namespace, name),
            runtime_type,
            levels = tiered_store.levels.len(),
            "Built runtime info"
        );

        Ok(Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            runtime_type: runtime_type.to_string(),
            storage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn runtime_type(&self) -> &str {
        &self.runtime_type
    }

    /// `namespace/name` key used in log fields and errors.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Total quota per medium. Media without levels are absent.
    pub fn level_storage_map(&self) -> &BTreeMap<MediumType, Quantity> {
        &self.storage
    }

    /// Total quota committed to `medium`, zero if no level uses it.
    pub fn total_quota_for_medium(&self, medium: MediumType) -> Quantity {
        self.storage.get(&medium).copied().unwrap_or_default()
    }
}

/// Capacity of a single level.
///
/// `quotaList` holds one entry per path and takes precedence over `quota`
/// when both are set. A level with neither contributes zero.
pub fn level_quota(level: &Level) -> Result<Quantity> {
    if let Some(list) = level.quota_list.as_deref().filter(|l| !l.trim().is_empty()) {
        let quotas = list
            .split(',')
            .map(str::parse::<Quantity>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        return Ok(Quantity::checked_sum(&quotas)?);
    }

    match &level.quota {
        Some(quota) => Ok(Quantity::try_from(quota)?),
        None => Ok(Quantity::zero()),
    }
}
