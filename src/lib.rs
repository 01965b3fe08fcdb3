//! goosefs-operator library crate
//!
//! Derives the CPU/memory requests and limits of GooseFS components from the
//! user's per-component overrides and the runtime's tiered-store layout.
//!
//! ```no_run
//! use goosefs_operator::{EngineConfig, GooseFsEngine};
//! # fn run(runtime: &goosefs_operator::crd::GooseFSRuntime) -> goosefs_operator::Result<()> {
//! let engine = GooseFsEngine::for_runtime(runtime, EngineConfig::from_env())?;
//! let values = engine.transform(runtime)?;
//! println!("{}", values.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod crd;
pub mod resources;

pub use controller::config::EngineConfig;
pub use controller::engine::GooseFsEngine;
pub use controller::error::{Error, Result};
pub use controller::runtime_info::RuntimeInfo;
pub use resources::values::GooseFsValues;
