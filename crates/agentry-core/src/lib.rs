//! Agentry Core - Shared abstractions for the agent backend
//!
//! This crate provides the types every other Agentry crate depends on:
//!
//! - `AgentryError` / `Result` - The common error type
//! - `InstanceConfig` - Configuration a pooled instance is built from
//! - `Resource` - Optional lifecycle hooks a pooled type can implement

mod config;
mod error;
mod resource;

pub use config::InstanceConfig;
pub use error::{AgentryError, Result};
pub use resource::Resource;
