//! Command-line interface definitions

use std::path::PathBuf;

use agentry_agents::AgentType;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

/// Run agents on pooled executors
#[derive(Debug, Parser)]
#[command(name = "agentry", version, about)]
pub struct Cli {
    /// Path to a settings file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "AGENTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose console logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an agent and run it
    Run(RunArgs),

    /// Print the effective settings
    Settings {
        /// Write the effective settings to the settings file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Agent type (adk, a2a, mcp, financial_host, custom_agent_type)
    #[arg(short = 't', long, default_value = "adk")]
    pub agent_type: AgentType,

    /// Agent name
    #[arg(short, long, default_value = "demo-agent")]
    pub name: String,

    /// Agent configuration entry, used when a new executor has to be built
    #[arg(short = 'c', long = "agent-config", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub agent_config: Vec<(String, Value)>,

    /// Execution parameter
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, Value)>,

    /// Number of executions to run concurrently
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub count: u16,
}

/// Parse `KEY=VALUE`; the value is read as JSON when it parses, else as a string
pub fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", s))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", s));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("model=m1").unwrap(), ("model".into(), json!("m1")));
        assert_eq!(parse_key_value("retries=3").unwrap(), ("retries".into(), json!(3)));
        assert_eq!(parse_key_value("flag=true").unwrap(), ("flag".into(), json!(true)));
        assert_eq!(parse_key_value("url=a=b").unwrap(), ("url".into(), json!("a=b")));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "agentry", "run", "-t", "a2a", "--name", "courier", "-c", "region=eu", "-p",
            "input_data=sample", "--count", "3",
        ])
        .expect("parse");

        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.agent_type, AgentType::A2a);
        assert_eq!(args.name, "courier");
        assert_eq!(args.agent_config, vec![("region".to_string(), json!("eu"))]);
        assert_eq!(args.params, vec![("input_data".to_string(), json!("sample"))]);
        assert_eq!(args.count, 3);
    }

    #[test]
    fn test_run_defaults_and_validation() {
        let cli = Cli::try_parse_from(["agentry", "run"]).expect("parse");
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.agent_type, AgentType::Adk);
        assert_eq!(args.count, 1);

        assert!(Cli::try_parse_from(["agentry", "run", "-t", "llm"]).is_err());
        assert!(Cli::try_parse_from(["agentry", "run", "--count", "0"]).is_err());
    }

    #[test]
    fn test_settings_command_with_global_config() {
        let cli =
            Cli::try_parse_from(["agentry", "settings", "--init", "--config", "/tmp/a.json"])
                .expect("parse");
        assert!(matches!(cli.command, Command::Settings { init: true }));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.json")));
    }
}
