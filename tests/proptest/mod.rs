// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::string_slice
)]

//! Property-based tests for goosefs-operator.
//!
//! Uses proptest to generate random overrides and tiered stores and verify
//! the transformation invariants.

#[path = "../common/mod.rs"]
mod common;

use proptest::prelude::*;

use common::fixtures::{GooseFSRuntimeBuilder, requirements};
use goosefs_operator::crd::MediumType;
use goosefs_operator::resources::{Quantity, ResourceName};
use goosefs_operator::{EngineConfig, GooseFsEngine, GooseFsValues};

/// Strategy for memory amounts in Mi (0 means "not declared").
fn memory_mi() -> impl Strategy<Value = u32> {
    0..=65_536u32
}

/// Strategy for CPU amounts in millicores (0 means "not declared").
fn cpu_milli() -> impl Strategy<Value = u32> {
    0..=16_000u32
}

/// Strategy for a medium.
fn any_medium() -> impl Strategy<Value = MediumType> {
    prop_oneof![
        Just(MediumType::Memory),
        Just(MediumType::Ssd),
        Just(MediumType::Hdd),
    ]
}

/// Strategy for tiered-store levels as (medium, quota in Gi).
fn any_levels() -> impl Strategy<Value = Vec<(MediumType, u32)>> {
    prop::collection::vec((any_medium(), 1..=512u32), 0..4)
}

fn build_runtime(
    cpu: u32,
    memory: u32,
    levels: &[(MediumType, u32)],
) -> goosefs_operator::crd::GooseFSRuntime {
    let cpu = format!("{}m", cpu);
    let memory = format!("{}Mi", memory);
    let mut limits = Vec::new();
    if cpu != "0m" {
        limits.push(("cpu", cpu.as_str()));
    }
    if memory != "0Mi" {
        limits.push(("memory", memory.as_str()));
    }

    let resources = requirements(&[], &limits);
    let quotas: Vec<String> = levels.iter().map(|(_, gi)| format!("{}Gi", gi)).collect();
    let mut builder = GooseFSRuntimeBuilder::default()
        .worker_resources(resources.clone())
        .fuse_resources(resources);
    for ((medium, _), quota) in levels.iter().zip(&quotas) {
        builder = builder.level(*medium, quota);
    }
    builder.build()
}

fn transform(runtime: &goosefs_operator::crd::GooseFSRuntime) -> GooseFsValues {
    let engine = GooseFsEngine::for_runtime(runtime, EngineConfig::default()).unwrap();
    engine.transform(runtime).unwrap()
}

proptest! {
    /// Property: Memory limit equals declared limit plus the summed memory-tier quota.
    #[test]
    fn test_memory_limit_arithmetic(
        cpu in cpu_milli(),
        memory in memory_mi(),
        levels in any_levels()
    ) {
        let runtime = build_runtime(cpu, memory, &levels);
        let values = transform(&runtime);

        let mem_gi: u64 = levels
            .iter()
            .filter(|(medium, _)| *medium == MediumType::Memory)
            .map(|(_, gi)| u64::from(*gi))
            .sum();
        let expected_mi = u64::from(memory) + mem_gi * 1024;

        for resources in [&values.worker.resources, &values.fuse.resources] {
            match resources.limit(&ResourceName::Memory) {
                Some(limit) => {
                    let limit: Quantity = limit.parse().unwrap();
                    let expected: Quantity = format!("{}Mi", expected_mi).parse().unwrap();
                    prop_assert_eq!(limit, expected);
                }
                None => prop_assert_eq!(expected_mi, 0),
            }
        }
    }

    /// Property: CPU is never modified by augmentation.
    #[test]
    fn test_cpu_untouched(
        cpu in cpu_milli(),
        memory in memory_mi(),
        levels in any_levels()
    ) {
        let runtime = build_runtime(cpu, memory, &levels);
        let values = transform(&runtime);

        let expected = (cpu != 0).then(|| format!("{}m", cpu).parse::<Quantity>().unwrap());
        let actual = values
            .worker
            .resources
            .limit(&ResourceName::Cpu)
            .map(|c| c.parse::<Quantity>().unwrap());
        prop_assert_eq!(actual, expected);
    }

    /// Property: Worker and job worker always end up identical.
    #[test]
    fn test_sibling_equality(
        cpu in cpu_milli(),
        memory in memory_mi(),
        levels in any_levels()
    ) {
        let runtime = build_runtime(cpu, memory, &levels);
        let values = transform(&runtime);
        prop_assert_eq!(&values.worker, &values.job_worker);
        prop_assert_eq!(&values.master, &values.job_master);
    }

    /// Property: Without a memory tier, augmentation is a plain copy.
    #[test]
    fn test_zero_quota_is_plain_copy(
        cpu in cpu_milli(),
        memory in memory_mi(),
        levels in prop::collection::vec(
            (prop_oneof![Just(MediumType::Ssd), Just(MediumType::Hdd)], 1..=512u32),
            0..4
        )
    ) {
        let runtime = build_runtime(cpu, memory, &levels);
        let values = transform(&runtime);

        let engine = GooseFsEngine::new("test", "test", EngineConfig::default());
        let mut copied = GooseFsValues::default();
        let mut as_master = runtime.clone();
        as_master.spec.master.resources = runtime.spec.worker.resources.clone();
        as_master.spec.job_master.resources = runtime.spec.worker.resources.clone();
        engine.transform_resources_for_master(&as_master, &mut copied).unwrap();

        prop_assert_eq!(&values.worker.resources, &copied.master.resources);
        prop_assert_eq!(&values.fuse.resources, &copied.master.resources);
    }

    /// Property: Canonical quantity strings re-parse to the same value.
    #[test]
    fn test_canonical_quantity_reparses(units in 0..=1_000_000i64, binary in any::<bool>()) {
        let format = if binary {
            goosefs_operator::resources::quantity::Format::BinarySI
        } else {
            goosefs_operator::resources::quantity::Format::DecimalSI
        };
        let quantity = Quantity::from_units(units, format);
        let reparsed: Quantity = quantity.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, quantity);
    }
}
