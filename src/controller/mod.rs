//! Controller-side pieces of goosefs-operator.
//!
//! Contains the transformation engine, runtime sizing info, configuration,
//! error handling and spec validation. Watch/reconcile loops live outside
//! this crate and call into [`engine::GooseFsEngine`].

pub mod config;
pub mod engine;
pub mod error;
pub mod runtime_info;
pub mod validation;
