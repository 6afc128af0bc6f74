//! Pool statistics types

use serde::{Deserialize, Serialize};

/// Snapshot of a resource pool's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Number of instances waiting in the idle queue
    idle: usize,
    /// Number of instances currently handed out to callers
    checked_out: usize,
    /// Number of instances the pool has ever constructed
    created: usize,
}

impl PoolStats {
    /// Create new pool statistics
    pub fn new(idle: usize, checked_out: usize, created: usize) -> Self {
        Self {
            idle,
            checked_out,
            created,
        }
    }

    /// Get the number of idle instances
    pub fn idle(&self) -> usize {
        self.idle
    }

    /// Get the number of checked-out instances
    pub fn checked_out(&self) -> usize {
        self.checked_out
    }

    /// Get the number of instances ever constructed
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of instances the pool still tracks (idle + checked out)
    pub fn total_live(&self) -> usize {
        self.idle + self.checked_out
    }

    /// Fraction of live instances currently in use (0.0 to 1.0)
    ///
    /// Returns 0.0 when the pool tracks no instances.
    pub fn utilization(&self) -> f64 {
        let live = self.total_live();
        if live == 0 {
            0.0
        } else {
            self.checked_out as f64 / live as f64
        }
    }

    /// Check whether the next acquisition will have to construct a new instance
    pub fn is_exhausted(&self) -> bool {
        self.idle == 0
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}
