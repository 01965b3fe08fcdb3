//! Custom Resource Definitions (CRDs) for goosefs-operator.
//!
//! - `GooseFSRuntime`: GooseFS cache runtime with per-component templates and tiered store

mod goosefs_runtime;

pub use goosefs_runtime::*;
