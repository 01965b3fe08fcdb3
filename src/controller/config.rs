//! Engine configuration.
//!
//! Defaults match the behavior of the upstream GooseFS runtime: only the
//! memory limit absorbs the memory-tier quota.

use tracing::warn;

/// Environment variable toggling memory request augmentation.
pub const AUGMENT_MEMORY_REQUEST_ENV: &str = "GOOSEFS_AUGMENT_MEMORY_REQUEST";

/// Knobs for the resource transformation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Also add the memory-tier quota to the memory request of workers and
    /// Fuse. Off by default.
    pub augment_memory_request: bool,
}

impl EngineConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let augment_memory_request = match lookup(AUGMENT_MEMORY_REQUEST_ENV) {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warn!(
                    variable = AUGMENT_MEMORY_REQUEST_ENV,
                    value = %raw,
                    "Unrecognized boolean, using default"
                );
                false
            }),
            None => false,
        };

        Self {
            augment_memory_request,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
