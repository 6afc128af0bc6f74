//! Agentry Agents - Agent records, executions and pooled executors
//!
//! This crate ties the resource pool to the agent domain:
//!
//! - `models` - Agent and execution records
//! - `AgentRegistry` - In-memory store for agents and their executions
//! - `Executor` - Capability of a (mocked) remote agent client
//! - `ExecutorPools` - One executor pool per agent type
//! - `AgentService` - Runs executions on pooled executors

mod executor;
pub mod models;
mod registry;
mod service;

pub use executor::{A2aClient, AdkClient, Executor, ExecutorPool, ExecutorPools};
pub use models::{
    Agent, AgentCreate, AgentStatus, AgentType, AgentUpdate, Execution, ExecutionCreate,
    ExecutionStatus, Parameters,
};
pub use registry::AgentRegistry;
pub use service::AgentService;
