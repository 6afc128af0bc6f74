//! Agentry Pool - Generic resource pooling
//!
//! This crate provides a thread-safe pool of reusable, possibly expensive
//! instances. Each instance remembers the configuration it was built from.

pub mod pool;

pub use pool::{
    ForeignInstance, InstanceId, Lease, PoolSettings, PoolStats, PooledInstance, ResourceFactory,
    ResourcePool,
};
