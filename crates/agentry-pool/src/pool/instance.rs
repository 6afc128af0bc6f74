//! Pooled instance handle

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};

use agentry_core::{InstanceConfig, Resource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pool::Shared;

/// Identity of an instance within its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An instance handed out by a `ResourcePool`
///
/// Only the pool can construct one, and it is not `Clone`, so the same
/// handout cannot be released twice. Dereferences to the wrapped value.
///
/// Dropping it without `release` or `detach` closes the value and removes it
/// from the pool's bookkeeping.
#[must_use = "dropping a pooled instance closes it instead of returning it to the pool"]
pub struct PooledInstance<T: Resource> {
    pub(crate) id: InstanceId,
    pub(crate) pool_id: Uuid,
    pub(crate) config: Arc<InstanceConfig>,
    pub(crate) value: Option<T>,
    pub(crate) shared: Weak<Shared<T>>,
}

impl<T: Resource> PooledInstance<T> {
    /// Get the instance identity
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Get the id of the pool that created this instance
    pub fn pool_id(&self) -> Uuid {
        self.pool_id
    }

    /// Get the configuration this instance was constructed from
    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// Move the value out, leaving a handle that does nothing on drop
    pub(crate) fn take_value(&mut self) -> T {
        self.value.take().expect("instance taken")
    }
}

impl<T: Resource> Deref for PooledInstance<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value.as_ref().expect("instance taken")
    }
}

impl<T: Resource> DerefMut for PooledInstance<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value.as_mut().expect("instance taken")
    }
}

impl<T: Resource> Drop for PooledInstance<T> {
    fn drop(&mut self) {
        let Some(mut value) = self.value.take() else {
            return;
        };

        tracing::warn!(
            pool_id = %self.pool_id,
            instance_id = %self.id,
            "pooled instance dropped without release, closing it"
        );

        if let Some(shared) = self.shared.upgrade() {
            shared.untrack(self.id);
        }
        if let Err(e) = value.close() {
            tracing::warn!(
                pool_id = %self.pool_id,
                instance_id = %self.id,
                error = %e,
                "close hook failed"
            );
        }
    }
}

impl<T: Resource + fmt::Debug> fmt::Debug for PooledInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledInstance")
            .field("id", &self.id)
            .field("pool_id", &self.pool_id)
            .field("config", &self.config)
            .field("value", &self.value)
            .finish()
    }
}
