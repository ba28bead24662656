//! Sizing and resize policy for the adjacency list.
//!
//! Settings are layered the same way the rest of fob loads configuration:
//! built-in defaults, then an optional TOML file, then `FOB_GRAPH_*`
//! environment variables.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Environment variable prefix for overrides (e.g. `FOB_GRAPH_MAX_LOAD_FACTOR`).
pub const ENV_PREFIX: &str = "FOB_GRAPH_";

/// Upper bound for the `initial_*` sizes. Node and edge addresses are `u32`.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 30;

/// Smallest accepted `max_load_factor`. Lower values would grow the bucket
/// array far past the number of edges.
pub const MIN_LOAD_FACTOR: f64 = 0.125;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Node slots allocated up front.
    pub initial_node_capacity: usize,

    /// Edge slots allocated up front.
    pub initial_edge_capacity: usize,

    /// Hash buckets allocated up front. Rounded up to a power of two.
    pub initial_bucket_count: usize,

    /// Average hash chain length that triggers a bucket doubling.
    pub max_load_factor: f64,

    /// Fraction of edge slots holding tombstones at which a full edge buffer
    /// is compacted in place instead of doubled.
    pub compaction_threshold: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            initial_node_capacity: 128,
            initial_edge_capacity: 256,
            initial_bucket_count: 256,
            max_load_factor: 0.7,
            compaction_threshold: 0.25,
        }
    }
}

impl GraphConfig {
    /// Load configuration from defaults, an optional TOML file and the
    /// environment, in increasing order of precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(GraphConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(GraphError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: GraphConfig = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        config.validate()?;

        tracing::debug!(?config, "loaded graph configuration");
        Ok(config)
    }

    /// Load configuration from a TOML string layered over the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: GraphConfig = Figment::from(Serialized::defaults(GraphConfig::default()))
            .merge(Toml::string(source))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the adjacency list cannot operate with.
    ///
    /// Every constructor that takes a `GraphConfig` calls this first.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("initial_node_capacity", self.initial_node_capacity),
            ("initial_edge_capacity", self.initial_edge_capacity),
            ("initial_bucket_count", self.initial_bucket_count),
        ] {
            if value == 0 || value > MAX_INITIAL_CAPACITY {
                return Err(GraphError::Config(format!(
                    "{name} must be in 1..={MAX_INITIAL_CAPACITY}, got {value}"
                )));
            }
        }
        if !(self.max_load_factor.is_finite() && self.max_load_factor >= MIN_LOAD_FACTOR) {
            return Err(GraphError::Config(format!(
                "max_load_factor must be a finite number >= {MIN_LOAD_FACTOR}, got {}",
                self.max_load_factor
            )));
        }
        if !(self.compaction_threshold > 0.0 && self.compaction_threshold <= 1.0) {
            return Err(GraphError::Config(format!(
                "compaction_threshold must be in (0, 1], got {}",
                self.compaction_threshold
            )));
        }
        Ok(())
    }

    /// Bucket count actually allocated for `initial_bucket_count`.
    pub(crate) fn bucket_count(&self) -> usize {
        self.initial_bucket_count.next_power_of_two()
    }
}
