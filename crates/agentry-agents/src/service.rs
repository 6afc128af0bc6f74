//! Agent orchestration service
//!
//! Runs executions on executors leased from the per-type pools. The lease
//! releases the executor on every path, so a failed execution never leaks
//! an instance.

use std::sync::Arc;

use agentry_core::{AgentryError, Result};
use agentry_pool::PoolStats;
use serde_json::Value;
use uuid::Uuid;

use crate::executor::ExecutorPools;
use crate::models::{Agent, AgentCreate, AgentType, AgentUpdate, Execution, ExecutionCreate, Parameters};
use crate::registry::AgentRegistry;


/// Front door for agent CRUD and execution dispatch
#[derive(Clone)]
pub struct AgentService {
    registry: Arc<AgentRegistry>,
    pools: Arc<ExecutorPools>,
}

impl AgentService {
    /// Create a service over an existing registry and set of executor pools
    pub fn new(registry: Arc<AgentRegistry>, pools: Arc<ExecutorPools>) -> Self {
        Self { registry, pools }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn pools(&self) -> &ExecutorPools {
        &self.pools
    }

    pub fn create_agent(&self, request: AgentCreate) -> Agent {
        self.registry.create_agent(request)
    }

    pub fn get_agent(&self, id: Uuid) -> Result<Agent> {
        self.registry
            .get_agent(id)
            .ok_or_else(|| AgentryError::NotFound(format!("Agent not found: {}", id)))
    }

    pub fn list_agents(&self) -> Vec<Agent> {
        self.registry.list_agents()
    }

    pub fn update_agent(&self, id: Uuid, update: AgentUpdate) -> Result<Agent> {
        self.registry
            .update_agent(id, update)
            .ok_or_else(|| AgentryError::NotFound(format!("Agent not found: {}", id)))
    }

    pub fn delete_agent(&self, id: Uuid) -> Result<Agent> {
        self.registry
            .delete_agent(id)
            .ok_or_else(|| AgentryError::NotFound(format!("Agent not found: {}", id)))
    }

    /// Run an agent once and record the outcome
    ///
    /// Errors from the executor, or from leasing one, do not fail the call:
    /// they are recorded on the returned execution with status `failed`.
    /// Only an unknown agent (or one deleted mid-run) is an error.
    #[tracing::instrument(skip(self, request), fields(agent_id = %agent_id))]
    pub async fn execute(&self, agent_id: Uuid, request: ExecutionCreate) -> Result<Execution> {
        let agent = self.get_agent(agent_id)?;

        let mut execution = Execution::pending(agent_id, request.parameters);
        self.registry.insert_execution(execution.clone())?;
        tracing::info!(
            execution_id = %execution.execution_id,
            agent_name = %agent.name,
            agent_type = %agent.agent_type,
            "execution submitted"
        );

        execution.mark_running();
        self.registry.insert_execution(execution.clone())?;

        match self.dispatch(&agent, &execution.parameters).await {
            Ok(result) => execution.complete(result),
            Err(e) => {
                tracing::warn!(execution_id = %execution.execution_id, error = %e, "execution failed");
                execution.fail(e.to_string());
            }
        }

        self.registry.insert_execution(execution.clone())?;
        tracing::info!(
            execution_id = %execution.execution_id,
            status = ?execution.status,
            "execution finished"
        );
        Ok(execution)
    }

    async fn dispatch(&self, agent: &Agent, params: &Parameters) -> Result<Value> {
        let pool = self.pools.get(agent.agent_type).ok_or_else(|| {
            AgentryError::NotSupported(format!(
                "No executor pool for agent type {}",
                agent.agent_type
            ))
        })?;

        // An empty agent config means "use the pool default", not "build from nothing"
        let config_override = (!agent.config.is_empty()).then(|| agent.config.clone());
        let executor = pool.lease(config_override)?;
        tracing::debug!(
            instance_id = %executor.id(),
            executor = executor.kind(),
            "dispatching to pooled executor"
        );

        executor.execute(params).await
    }

    pub fn get_execution(&self, agent_id: Uuid, execution_id: Uuid) -> Result<Execution> {
        self.registry
            .get_execution(agent_id, execution_id)
            .ok_or_else(|| AgentryError::NotFound(format!("Execution not found: {}", execution_id)))
    }

    pub fn list_executions(&self, agent_id: Uuid) -> Result<Vec<Execution>> {
        self.get_agent(agent_id)?;
        Ok(self.registry.list_executions(agent_id))
    }

    pub fn pool_stats(&self) -> Vec<(AgentType, PoolStats)> {
        self.pools.stats()
    }

    /// Shut down every executor pool
    pub fn shutdown(&self) -> usize {
        let closed = self.pools.shutdown();
        tracing::info!(closed, "agent service shut down");
        closed
    }
}
