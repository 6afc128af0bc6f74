//! Agent and execution records

use std::fmt;
use std::str::FromStr;

use agentry_core::{AgentryError, InstanceConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Parameters passed to an execution
pub type Parameters = serde_json::Map<String, Value>;

/// Kind of remote agent an agent record is backed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Mcp,
    A2a,
    Adk,
    FinancialHost,
    #[serde(rename = "custom_agent_type")]
    Custom,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        AgentType::Mcp,
        AgentType::A2a,
        AgentType::Adk,
        AgentType::FinancialHost,
        AgentType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Mcp => "mcp",
            AgentType::A2a => "a2a",
            AgentType::Adk => "adk",
            AgentType::FinancialHost => "financial_host",
            AgentType::Custom => "custom_agent_type",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = AgentryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AgentryError::NotSupported(format!("Unknown agent type: {}", s)))
    }
}

/// Lifecycle status of an agent record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Created,
    Ready,
    Running,
    Stopped,
    Error,
    Updated,
}

/// Status of a single execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ExecutionStatus {
    /// Check if the execution has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }
}

/// Request to create an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCreate {
    pub name: String,
    pub agent_type: AgentType,
    #[serde(default)]
    pub config: InstanceConfig,
}

impl AgentCreate {
    pub fn new(name: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            name: name.into(),
            agent_type,
            config: InstanceConfig::new(),
        }
    }

    pub fn with_config(mut self, config: InstanceConfig) -> Self {
        self.config = config;
        self
    }
}

/// Partial update of an agent; only fields that are set are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<InstanceConfig>,
}

/// An agent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: Uuid,
    pub name: String,
    pub agent_type: AgentType,
    /// Used as the configuration override when leasing an executor
    pub config: InstanceConfig,
    pub status: AgentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(request: AgentCreate) -> Self {
        let now = Utc::now();
        Self {
            agent_id: Uuid::new_v4(),
            name: request.name,
            agent_type: request.agent_type,
            config: request.config,
            status: AgentStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at` and marking the agent updated
    pub fn apply(&mut self, update: AgentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(config) = update.config {
            self.config = config;
        }
        self.status = AgentStatus::Updated;
        self.updated_at = Utc::now();
    }
}

/// Request to run an agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionCreate {
    #[serde(default)]
    pub parameters: Parameters,
}

impl ExecutionCreate {
    pub fn new(parameters: Parameters) -> Self {
        Self { parameters }
    }
}

/// A single run of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub execution_id: Uuid,
    pub agent_id: Uuid,
    pub parameters: Parameters,
    pub status: ExecutionStatus,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl Execution {
    /// Create a pending execution submitted now
    pub fn pending(agent_id: Uuid, parameters: Parameters) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            agent_id,
            parameters,
            status: ExecutionStatus::Pending,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn complete(&mut self, result: Value) {
        self.status = ExecutionStatus::Completed;
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = ExecutionStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }
}
