//! In-memory store for agents and their executions

use std::collections::HashMap;

use agentry_core::{AgentryError, Result};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{Agent, AgentCreate, AgentUpdate, Execution};

/// Stores agent records and the executions run against them
#[derive(Default)]
pub struct AgentRegistry {
    /// Agents by id
    agents: RwLock<HashMap<Uuid, Agent>>,

    /// Executions by agent id, then execution id
    executions: RwLock<HashMap<Uuid, HashMap<Uuid, Execution>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new agent
    pub fn create_agent(&self, request: AgentCreate) -> Agent {
        let agent = Agent::new(request);
        tracing::info!(
            agent_id = %agent.agent_id,
            agent_name = %agent.name,
            agent_type = %agent.agent_type,
            "agent created"
        );

        self.executions.write().insert(agent.agent_id, HashMap::new());
        self.agents.write().insert(agent.agent_id, agent.clone());
        agent
    }

    pub fn get_agent(&self, id: Uuid) -> Option<Agent> {
        self.agents.read().get(&id).cloned()
    }

    /// All agents, oldest first
    pub fn list_agents(&self) -> Vec<Agent> {
        let mut agents: Vec<_> = self.agents.read().values().cloned().collect();
        agents.sort_by_key(|a| (a.created_at, a.agent_id));
        agents
    }

    pub fn update_agent(&self, id: Uuid, update: AgentUpdate) -> Option<Agent> {
        let mut agents = self.agents.write();
        let agent = agents.get_mut(&id)?;
        agent.apply(update);
        tracing::debug!(agent_id = %id, "agent updated");
        Some(agent.clone())
    }

    /// Remove an agent together with all of its executions
    pub fn delete_agent(&self, id: Uuid) -> Option<Agent> {
        let agent = self.agents.write().remove(&id)?;
        let removed = self
            .executions
            .write()
            .remove(&id)
            .map(|e| e.len())
            .unwrap_or(0);
        tracing::info!(agent_id = %id, executions_removed = removed, "agent deleted");
        Some(agent)
    }

    /// Insert or replace an execution record
    ///
    /// Fails if the owning agent no longer exists.
    pub fn insert_execution(&self, execution: Execution) -> Result<()> {
        let mut executions = self.executions.write();
        let per_agent = executions.get_mut(&execution.agent_id).ok_or_else(|| {
            AgentryError::NotFound(format!("Agent not found: {}", execution.agent_id))
        })?;
        per_agent.insert(execution.execution_id, execution);
        Ok(())
    }

    pub fn get_execution(&self, agent_id: Uuid, execution_id: Uuid) -> Option<Execution> {
        self.executions
            .read()
            .get(&agent_id)
            .and_then(|per_agent| per_agent.get(&execution_id))
            .cloned()
    }

    /// Executions of an agent, oldest first; empty for unknown agents
    pub fn list_executions(&self, agent_id: Uuid) -> Vec<Execution> {
        let mut executions: Vec<_> = self
            .executions
            .read()
            .get(&agent_id)
            .map(|per_agent| per_agent.values().cloned().collect())
            .unwrap_or_default();
        executions.sort_by_key(|e| (e.submitted_at, e.execution_id));
        executions
    }
}
