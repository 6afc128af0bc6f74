//! Remote agent executors and their pools

use std::collections::{BTreeMap, HashMap};

use agentry_core::{AgentryError, InstanceConfig, Resource, Result};
use agentry_pool::{PoolSettings, PoolStats, ResourcePool};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::models::{AgentType, Parameters};

/// A client for a remote agent service
///
/// Executors are pooled, so `release` should reset any per-call state and
/// `close` should tear down connections.
#[async_trait]
pub trait Executor: Resource + Sync {
    /// Short name of the remote service (e.g., "adk", "a2a")
    fn kind(&self) -> &'static str;

    /// Configuration the client was built with
    fn config(&self) -> &InstanceConfig;

    /// Run the remote agent with the given parameters
    async fn execute(&self, params: &Parameters) -> Result<Value>;
}

/// Pool of boxed executors for one agent type
pub type ExecutorPool = ResourcePool<Box<dyn Executor>>;

fn mock_response(label: &str, config: &InstanceConfig, params: &Parameters) -> Value {
    json!({
        "status": "success",
        "message": format!("{} mock execution successful", label),
        "config": config.to_value(),
        "params": Value::Object(params.clone()),
    })
}

/// Mock client for an ADK agent service
#[derive(Debug, Clone)]
pub struct AdkClient {
    config: InstanceConfig,
}

impl AdkClient {
    pub fn new(config: InstanceConfig) -> Self {
        tracing::debug!(config = ?config, "ADK client initialised");
        Self { config }
    }
}

impl Resource for AdkClient {
    fn release(&mut self) -> Result<()> {
        tracing::debug!("ADK client released");
        Ok(())
    }
}

#[async_trait]
impl Executor for AdkClient {
    fn kind(&self) -> &'static str {
        "adk"
    }

    fn config(&self) -> &InstanceConfig {
        &self.config
    }

    async fn execute(&self, params: &Parameters) -> Result<Value> {
        tracing::debug!(params = ?params, "ADK client executing");
        Ok(mock_response("ADK", &self.config, params))
    }
}

/// Mock client for an agent-to-agent (A2A) service
#[derive(Debug, Clone)]
pub struct A2aClient {
    config: InstanceConfig,
}

impl A2aClient {
    pub fn new(config: InstanceConfig) -> Self {
        tracing::debug!(config = ?config, "A2A client initialised");
        Self { config }
    }
}

impl Resource for A2aClient {
    fn release(&mut self) -> Result<()> {
        tracing::debug!("A2A client released");
        Ok(())
    }
}

#[async_trait]
impl Executor for A2aClient {
    fn kind(&self) -> &'static str {
        "a2a"
    }

    fn config(&self) -> &InstanceConfig {
        &self.config
    }

    async fn execute(&self, params: &Parameters) -> Result<Value> {
        tracing::debug!(params = ?params, "A2A client executing");
        Ok(mock_response("A2A", &self.config, params))
    }
}

fn build_adk(config: &InstanceConfig) -> Result<Box<dyn Executor>> {
    Ok(Box::new(AdkClient::new(config.clone())))
}

fn build_a2a(config: &InstanceConfig) -> Result<Box<dyn Executor>> {
    Ok(Box::new(A2aClient::new(config.clone())))
}

/// One executor pool per agent type
///
/// Built once at startup and shared with the service; `shutdown` closes
/// every pool.
#[derive(Default)]
pub struct ExecutorPools {
    pools: HashMap<AgentType, ExecutorPool>,
}

impl ExecutorPools {
    /// Create an empty set of pools
    pub fn new() -> Self {
        Self::default()
    }

    /// Build mock executor pools from per-type settings
    ///
    /// Fails if a type has no executor implementation or a pool cannot be
    /// filled.
    pub fn from_settings(settings: &BTreeMap<AgentType, PoolSettings>) -> Result<Self> {
        let mut pools = Self::new();
        for (agent_type, pool_settings) in settings {
            let pool = match agent_type {
                AgentType::Adk => ResourcePool::from_settings(build_adk, pool_settings)?,
                AgentType::A2a => ResourcePool::from_settings(build_a2a, pool_settings)?,
                other => {
                    return Err(AgentryError::Configuration(format!(
                        "No executor available for agent type {}",
                        other
                    )));
                }
            };
            tracing::info!(
                agent_type = %agent_type,
                initial_size = pool_settings.initial_size(),
                "executor pool ready"
            );
            pools.register(*agent_type, pool);
        }
        Ok(pools)
    }

    /// Add a pool, replacing any previous pool for the same type
    pub fn register(&mut self, agent_type: AgentType, pool: ExecutorPool) {
        if let Some(previous) = self.pools.insert(agent_type, pool) {
            previous.shutdown();
        }
    }

    pub fn with_pool(mut self, agent_type: AgentType, pool: ExecutorPool) -> Self {
        self.register(agent_type, pool);
        self
    }

    pub fn get(&self, agent_type: AgentType) -> Option<&ExecutorPool> {
        self.pools.get(&agent_type)
    }

    /// Statistics for every pool, ordered by agent type
    pub fn stats(&self) -> Vec<(AgentType, PoolStats)> {
        let mut stats: Vec<_> = self
            .pools
            .iter()
            .map(|(agent_type, pool)| (*agent_type, pool.stats()))
            .collect();
        stats.sort_by_key(|(agent_type, _)| *agent_type);
        stats
    }

    /// Shut down every pool, returning the number of idle executors closed
    pub fn shutdown(&self) -> usize {
        self.pools.values().map(|pool| pool.shutdown()).sum()
    }
}
