//! Command implementations

use std::path::Path;
use std::sync::Arc;

use agentry_agents::{
    Agent, AgentCreate, AgentRegistry, AgentService, AgentType, Execution, ExecutionCreate,
    ExecutorPools, Parameters,
};
use agentry_core::InstanceConfig;
use agentry_pool::PoolStats;
use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::RunArgs;
use crate::settings::{self, AppSettings};

/// Output of `agentry run`
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub agent: Agent,
    pub executions: Vec<Execution>,
    pub pools: Vec<PoolReport>,
}

#[derive(Debug, Serialize)]
pub struct PoolReport {
    pub agent_type: AgentType,
    #[serde(flatten)]
    pub stats: PoolStats,
}

/// Build the service from settings, run the agent `count` times concurrently
/// and shut the pools down
pub async fn run(args: RunArgs, settings: &AppSettings) -> Result<RunReport> {
    let pools =
        ExecutorPools::from_settings(&settings.pools).context("Failed to build executor pools")?;
    let service = AgentService::new(Arc::new(AgentRegistry::new()), Arc::new(pools));

    let agent = service.create_agent(
        AgentCreate::new(args.name, args.agent_type)
            .with_config(args.agent_config.into_iter().collect::<InstanceConfig>()),
    );
    let parameters: Parameters = args.params.into_iter().collect();

    let handles: Vec<_> = (0..args.count)
        .map(|_| {
            let service = service.clone();
            let agent_id = agent.agent_id;
            let request = ExecutionCreate::new(parameters.clone());
            tokio::spawn(async move { service.execute(agent_id, request).await })
        })
        .collect();

    let mut executions = Vec::with_capacity(handles.len());
    for handle in handles {
        executions.push(handle.await.context("Execution task panicked")??);
    }

    let pools = service
        .pool_stats()
        .into_iter()
        .map(|(agent_type, stats)| PoolReport { agent_type, stats })
        .collect();
    service.shutdown();

    Ok(RunReport {
        agent,
        executions,
        pools,
    })
}

/// Print the effective settings, optionally writing them to disk first
pub fn show_settings(settings: &AppSettings, init: bool, path: Option<&Path>) -> Result<String> {
    if init {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => settings::settings_file()?,
        };
        settings.save(&path)?;
        tracing::info!(path = %path.display(), "settings written");
    }
    Ok(serde_json::to_string_pretty(settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentry_agents::ExecutionStatus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run_args(agent_type: AgentType, count: u16) -> RunArgs {
        RunArgs {
            agent_type,
            name: "demo".into(),
            agent_config: vec![("model".into(), json!("m1"))],
            params: vec![("input_data".into(), json!("sample"))],
            count,
        }
    }

    #[tokio::test]
    async fn test_run_reports_executions_and_pool_stats() {
        let report = run(run_args(AgentType::Adk, 3), &AppSettings::default())
            .await
            .expect("run");

        assert_eq!(report.agent.name, "demo");
        assert_eq!(report.executions.len(), 3);
        for execution in &report.executions {
            assert_eq!(execution.status, ExecutionStatus::Completed);
            assert_eq!(execution.result.as_ref().unwrap()["params"], json!({"input_data": "sample"}));
        }

        let adk = report
            .pools
            .iter()
            .find(|p| p.agent_type == AgentType::Adk)
            .expect("adk pool");
        assert_eq!(adk.stats.checked_out(), 0);
        assert_eq!(adk.stats.idle(), adk.stats.created());

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["pools"][0]["agent_type"], json!("a2a"));
        assert_eq!(json["pools"][0]["idle"], json!(2));
    }

    #[tokio::test]
    async fn test_run_unsupported_type_records_failures() {
        let report = run(run_args(AgentType::Mcp, 1), &AppSettings::default())
            .await
            .expect("run");
        assert_eq!(report.executions[0].status, ExecutionStatus::Failed);
    }

    #[test]
    fn test_show_settings_init_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");

        let output = show_settings(&AppSettings::default(), true, Some(&path)).expect("show");
        assert!(path.exists());
        assert_eq!(AppSettings::load(Some(&path)).expect("load"), AppSettings::default());
        assert!(output.contains("\"adk\""));
    }
}
