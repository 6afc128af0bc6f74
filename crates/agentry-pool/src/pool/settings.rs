//! Pool settings types

use agentry_core::InstanceConfig;
use serde::{Deserialize, Serialize};

/// Settings for a resource pool
///
/// Controls how many instances are built eagerly and which configuration
/// instances are built from when a caller supplies no override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Number of instances created when the pool is constructed
    initial_size: usize,
    /// Configuration used for eager instances and override-less acquisitions
    default_config: InstanceConfig,
}

impl PoolSettings {
    /// Create pool settings with the given eager size and an empty default config
    pub fn new(initial_size: usize) -> Self {
        Self {
            initial_size,
            default_config: InstanceConfig::new(),
        }
    }

    /// Set the number of instances created at construction
    pub fn with_initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Set the default instance configuration
    pub fn with_default_config(mut self, config: InstanceConfig) -> Self {
        self.default_config = config;
        self
    }

    /// Get the eager pool size
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Get the default instance configuration
    pub fn default_config(&self) -> &InstanceConfig {
        &self.default_config
    }
}

impl Default for PoolSettings {
    /// Create default pool settings
    ///
    /// Defaults:
    /// - initial_size: 0
    /// - default_config: empty
    fn default() -> Self {
        Self::new(0)
    }
}
