//! Resource pooling for reusable instances
//!
//! The pool hands out idle instances in FIFO order and grows on demand when
//! none are idle; it never blocks and never caps the number of live
//! instances. A configuration override passed to `acquire` is only used when
//! a new instance has to be built; an idle instance is always handed out as-is.
//!
//! # Example
//!
//! ```ignore
//! use agentry_pool::{PoolSettings, ResourcePool};
//!
//! let settings = PoolSettings::new(2).with_default_config(default_config);
//! let pool = ResourcePool::from_settings(|config: &InstanceConfig| Client::new(config), &settings)?;
//!
//! {
//!     let client = pool.lease(None)?;
//!     client.call()?;
//!     // Instance returned to the pool on drop
//! }
//!
//! pool.shutdown();
//! ```

mod instance;
mod pool;
mod settings;
mod stats;


pub use instance::{InstanceId, PooledInstance};
pub use pool::{ForeignInstance, Lease, ResourceFactory, ResourcePool};
pub use settings::PoolSettings;
pub use stats::PoolStats;
