//! Resource pool implementation

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use agentry_core::{AgentryError, InstanceConfig, Resource, Result};
use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

use super::instance::{InstanceId, PooledInstance};
use super::settings::PoolSettings;
use super::stats::PoolStats;

/// Factory trait for constructing pooled instances
///
/// Any `Fn(&InstanceConfig) -> Result<T>` closure is a factory.
pub trait ResourceFactory<T>: Send + Sync + 'static {
    /// Build a new instance from the given configuration
    fn create(&self, config: &InstanceConfig) -> Result<T>;
}

impl<T, F> ResourceFactory<T> for F
where
    F: Fn(&InstanceConfig) -> Result<T> + Send + Sync + 'static,
{
    fn create(&self, config: &InstanceConfig) -> Result<T> {
        self(config)
    }
}

/// Returned when an instance is handed to a pool that did not check it out
///
/// Carries the instance back to the caller so it is never silently lost.
/// Dropping it drops the instance, which closes it.
#[derive(Error)]
#[error("instance {instance_id} is not checked out from pool {pool_id}")]
pub struct ForeignInstance<T: Resource> {
    instance_id: InstanceId,
    pool_id: Uuid,
    instance: PooledInstance<T>,
}

impl<T: Resource> ForeignInstance<T> {
    /// Take back the rejected instance
    pub fn into_instance(self) -> PooledInstance<T> {
        self.instance
    }
}

impl<T: Resource> fmt::Debug for ForeignInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignInstance")
            .field("instance_id", &self.instance_id)
            .field("instance_pool_id", &self.instance.pool_id)
            .field("pool_id", &self.pool_id)
            .finish()
    }
}

/// An instance waiting in the idle queue
struct IdleInstance<T> {
    id: InstanceId,
    config: Arc<InstanceConfig>,
    value: T,
}

/// State guarded by a single lock so pop-or-miss is atomic
struct PoolState<T> {
    /// Instances available for acquisition, oldest first
    idle: VecDeque<IdleInstance<T>>,
    /// Identities of instances currently handed out
    checked_out: HashSet<InstanceId>,
    /// Set once `shutdown` has run
    closed: bool,
}

/// Tracking shared between a pool and the instances it hands out
pub(crate) struct Shared<T> {
    state: Mutex<PoolState<T>>,
    /// Configuration each tracked instance was built from (best-effort)
    instance_configs: Mutex<HashMap<InstanceId, Arc<InstanceConfig>>>,
}

impl<T> Shared<T> {
    /// Forget an instance that will never come back to the pool
    pub(crate) fn untrack(&self, id: InstanceId) {
        self.state.lock().checked_out.remove(&id);
        self.instance_configs.lock().remove(&id);
    }
}

/// A pool of reusable instances of `T`
///
/// Idle instances are handed out in FIFO order. When none are idle, a new
/// instance is constructed outside the lock, so `acquire` never waits on
/// other callers and the pool grows as needed.
pub struct ResourcePool<T: Resource> {
    /// Pool identity, stamped on every instance it creates
    id: Uuid,
    /// Instance factory
    factory: Box<dyn ResourceFactory<T>>,
    /// Configuration used when no override is supplied
    default_config: Arc<InstanceConfig>,
    /// Idle queue, checked-out set and config records
    shared: Arc<Shared<T>>,
    /// Next instance identity
    next_id: AtomicU64,
    /// Number of instances ever constructed
    created: AtomicUsize,
}

impl<T: Resource> ResourcePool<T> {
    /// Create a pool and eagerly build `initial_size` instances from `default_config`
    ///
    /// A constructor failure aborts construction and is returned to the caller;
    /// instances built before the failure are closed.
    pub fn new<F: ResourceFactory<T>>(
        factory: F,
        initial_size: usize,
        default_config: InstanceConfig,
    ) -> Result<Self> {
        let pool = Self {
            id: Uuid::new_v4(),
            factory: Box::new(factory),
            default_config: Arc::new(default_config),
            shared: Arc::new(Shared {
                state: Mutex::new(PoolState {
                    idle: VecDeque::with_capacity(initial_size),
                    checked_out: HashSet::new(),
                    closed: false,
                }),
                instance_configs: Mutex::new(HashMap::with_capacity(initial_size)),
            }),
            next_id: AtomicU64::new(0),
            created: AtomicUsize::new(0),
        };

        let mut eager = Vec::with_capacity(initial_size);
        for _ in 0..initial_size {
            match pool.create_instance(pool.default_config.clone()) {
                Ok(entry) => eager.push(entry),
                Err(e) => {
                    for entry in eager {
                        pool.dispose(entry.id, entry.value);
                    }
                    return Err(e);
                }
            }
        }
        pool.shared.state.lock().idle.extend(eager);

        tracing::debug!(pool_id = %pool.id, initial_size, "resource pool created");
        Ok(pool)
    }

    /// Create a pool from serialisable settings
    pub fn from_settings<F: ResourceFactory<T>>(factory: F, settings: &PoolSettings) -> Result<Self> {
        Self::new(
            factory,
            settings.initial_size(),
            settings.default_config().clone(),
        )
    }

    /// Get an instance from the pool
    ///
    /// This will:
    /// 1. Hand out the oldest idle instance if there is one, ignoring
    ///    `config_override` entirely
    /// 2. Otherwise build a new instance from `config_override`, or from the
    ///    default config when no override is given
    ///
    /// Never waits for a release. Fails only if the factory fails or the pool
    /// has been shut down.
    pub fn acquire(&self, config_override: Option<InstanceConfig>) -> Result<PooledInstance<T>> {
        {
            let mut state = self.shared.state.lock();
            if state.closed {
                return Err(AgentryError::PoolClosed);
            }
            if let Some(entry) = state.idle.pop_front() {
                state.checked_out.insert(entry.id);
                let idle = state.idle.len();
                drop(state);

                tracing::debug!(
                    pool_id = %self.id,
                    instance_id = %entry.id,
                    override_ignored = config_override.is_some(),
                    idle,
                    "reusing idle instance"
                );
                return Ok(self.hand_out(entry));
            }
        }

        let config = match config_override {
            Some(config) => Arc::new(config),
            None => self.default_config.clone(),
        };
        let entry = self.create_instance(config)?;

        let mut state = self.shared.state.lock();
        if state.closed {
            drop(state);
            tracing::debug!(
                pool_id = %self.id,
                instance_id = %entry.id,
                "pool shut down during construction, closing new instance"
            );
            self.dispose(entry.id, entry.value);
            return Err(AgentryError::PoolClosed);
        }
        state.checked_out.insert(entry.id);
        drop(state);

        Ok(self.hand_out(entry))
    }

    /// Get an instance wrapped in a guard that releases it on drop
    pub fn lease(&self, config_override: Option<InstanceConfig>) -> Result<Lease<'_, T>> {
        let instance = self.acquire(config_override)?;
        Ok(Lease {
            instance: Some(instance),
            pool: self,
        })
    }

    /// Return an instance to the pool
    ///
    /// Runs the instance's `release` hook first. A failing hook is logged and
    /// the instance is pooled anyway. Once the pool is shut down, returned
    /// instances are closed instead of queued.
    pub fn release(
        &self,
        mut instance: PooledInstance<T>,
    ) -> std::result::Result<(), ForeignInstance<T>> {
        if !self.owns_checked_out(&instance) {
            tracing::warn!(
                pool_id = %self.id,
                instance_id = %instance.id,
                instance_pool_id = %instance.pool_id,
                "rejecting release of an instance not checked out from this pool"
            );
            return Err(self.foreign(instance));
        }

        let id = instance.id;
        let config = instance.config.clone();
        let mut value = instance.take_value();
        drop(instance);

        if let Err(e) = value.release() {
            tracing::warn!(
                pool_id = %self.id,
                instance_id = %id,
                error = %e,
                "release hook failed, returning instance to pool anyway"
            );
        }

        let mut state = self.shared.state.lock();
        state.checked_out.remove(&id);

        if state.closed {
            drop(state);
            tracing::debug!(pool_id = %self.id, instance_id = %id, "pool closed, disposing released instance");
            self.dispose(id, value);
            return Ok(());
        }

        state.idle.push_back(IdleInstance {
            id,
            config: config.clone(),
            value,
        });
        let idle = state.idle.len();
        drop(state);

        tracing::debug!(
            pool_id = %self.id,
            instance_id = %id,
            config = ?config,
            idle,
            "instance returned to pool"
        );
        Ok(())
    }

    /// Remove an instance from all tracking and hand the raw value to the caller
    ///
    /// The pool will never see this instance again; its `close` hook is the
    /// caller's responsibility.
    pub fn detach(
        &self,
        mut instance: PooledInstance<T>,
    ) -> std::result::Result<T, ForeignInstance<T>> {
        if !self.owns_checked_out(&instance) {
            return Err(self.foreign(instance));
        }

        let value = instance.take_value();
        self.shared.untrack(instance.id);
        tracing::debug!(pool_id = %self.id, instance_id = %instance.id, "instance detached from pool");
        Ok(value)
    }

    /// Number of idle instances
    ///
    /// Checked-out instances are not counted.
    pub fn size(&self) -> usize {
        self.shared.state.lock().idle.len()
    }

    /// Get current pool statistics
    pub fn stats(&self) -> PoolStats {
        let state = self.shared.state.lock();
        PoolStats::new(
            state.idle.len(),
            state.checked_out.len(),
            self.created.load(Ordering::SeqCst),
        )
    }

    /// Get the configuration a tracked instance was built from
    pub fn instance_config(&self, id: InstanceId) -> Option<InstanceConfig> {
        self.shared
            .instance_configs
            .lock()
            .get(&id)
            .map(|config| InstanceConfig::clone(config))
    }

    /// Get the configuration used when no override is supplied
    pub fn default_config(&self) -> &InstanceConfig {
        &self.default_config
    }

    /// Get the pool identity
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Check whether `shutdown` has been called
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Close the pool and dispose of every idle instance
    ///
    /// Later acquisitions fail with `PoolClosed`; instances still checked out
    /// are closed when they are released or dropped. Returns the number of
    /// idle instances closed.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<_> = {
            let mut state = self.shared.state.lock();
            state.closed = true;
            state.idle.drain(..).collect()
        };

        let count = drained.len();
        for entry in drained {
            self.dispose(entry.id, entry.value);
        }

        tracing::info!(pool_id = %self.id, closed = count, "resource pool shut down");
        count
    }

    fn create_instance(&self, config: Arc<InstanceConfig>) -> Result<IdleInstance<T>> {
        let value = self.factory.create(&config).map_err(|e| {
            tracing::error!(pool_id = %self.id, error = %e, "failed to construct pooled instance");
            e
        })?;

        let id = InstanceId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.created.fetch_add(1, Ordering::SeqCst);
        self.shared.instance_configs.lock().insert(id, config.clone());

        tracing::debug!(pool_id = %self.id, instance_id = %id, config = ?config, "constructed new instance");
        Ok(IdleInstance { id, config, value })
    }

    fn hand_out(&self, entry: IdleInstance<T>) -> PooledInstance<T> {
        PooledInstance {
            id: entry.id,
            pool_id: self.id,
            config: entry.config,
            value: Some(entry.value),
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Run the close hook and drop the instance from bookkeeping
    fn dispose(&self, id: InstanceId, mut value: T) {
        if let Err(e) = value.close() {
            tracing::warn!(
                pool_id = %self.id,
                instance_id = %id,
                error = %e,
                "close hook failed"
            );
        }
        self.shared.instance_configs.lock().remove(&id);
    }

    fn owns_checked_out(&self, instance: &PooledInstance<T>) -> bool {
        instance.pool_id == self.id && self.shared.state.lock().checked_out.contains(&instance.id)
    }

    fn foreign(&self, instance: PooledInstance<T>) -> ForeignInstance<T> {
        ForeignInstance {
            instance_id: instance.id,
            pool_id: self.id,
            instance,
        }
    }
}

/// An instance borrowed from the pool
///
/// When dropped, the instance is automatically released back to the pool.
pub struct Lease<'a, T: Resource> {
    instance: Option<PooledInstance<T>>,
    pool: &'a ResourcePool<T>,
}

impl<'a, T: Resource> Lease<'a, T> {
    /// Get the instance identity
    pub fn id(&self) -> InstanceId {
        self.inner().id()
    }

    /// Get the configuration the leased instance was built from
    pub fn config(&self) -> &InstanceConfig {
        self.inner().config()
    }

    /// Get the underlying pooled instance
    pub fn inner(&self) -> &PooledInstance<T> {
        self.instance.as_ref().expect("instance taken")
    }
}

impl<'a, T: Resource> Deref for Lease<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.inner()
    }
}

impl<'a, T: Resource> DerefMut for Lease<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.instance.as_mut().expect("instance taken")
    }
}

impl<'a, T: Resource> Drop for Lease<'a, T> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            if let Err(e) = self.pool.release(instance) {
                tracing::warn!(error = %e, "lease could not return its instance");
            }
        }
    }
}
