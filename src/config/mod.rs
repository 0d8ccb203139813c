//! Resolver configuration.
//!
//! The engine reads its limits from a [`ResolverConfig`]. It can be built in
//! code, or loaded from the `[resolver]` table of a TOML file:
//!
//! ```toml
//! [resolver]
//! max_depth = 5
//! parallel_loads = true
//! load_timeout_secs = 10
//! ```
//!
//! Every key is optional; missing keys take their defaults.

mod parser;

pub use parser::parse_config;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::DEFAULT_MAX_DEPTH;
use crate::core::ResolutionError;

/// Limits and dispatch behavior of one [`ContentResolver`](crate::resolver::ContentResolver).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deepest level of the entity graph that is loaded and substituted.
    pub max_depth: usize,

    /// Run the loader batches of one priority level concurrently.
    pub parallel_loads: bool,

    /// Upper bound for a single loader call, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_timeout_secs: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parallel_loads: true,
            load_timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    resolver: ResolverConfig,
}

impl ResolverConfig {
    /// Default configuration with a different depth bound.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Parse the `[resolver]` table of a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.resolver.validate()?;
        Ok(file.resolver)
    }

    /// Load the `[resolver]` table of a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let file: ConfigFile = parse_config(path)?;
        file.resolver.validate()?;
        tracing::debug!("Loaded resolver config from {}: {:?}", path.display(), file.resolver);
        Ok(file.resolver)
    }

    /// Check the configured limits.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth < 1 {
            return Err(ResolutionError::InvalidConfig {
                reason: "max_depth must be at least 1".to_string(),
            }
            .into());
        }
        if self.load_timeout_secs == Some(0) {
            return Err(ResolutionError::InvalidConfig {
                reason: "load_timeout_secs must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// The loader timeout, if one is configured.
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_secs.map(Duration::from_secs)
    }
}
