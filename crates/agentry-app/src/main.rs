//! agentry - run agents on pooled executors

mod cli;
mod commands;
mod logging;
mod settings;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::logging::LoggingConfig;
use crate::settings::AppSettings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = AppSettings::load(cli.config.as_deref())?;

    let logging = if cli.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };
    let _log_guard = logging::init(logging.with_filter(settings.log_filter.clone()))?;

    match cli.command {
        Command::Run(args) => {
            let report = commands::run(args, &settings).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Settings { init } => {
            println!(
                "{}",
                commands::show_settings(&settings, init, cli.config.as_deref())?
            );
        }
    }

    Ok(())
}
