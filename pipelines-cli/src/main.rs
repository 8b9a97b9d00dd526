//! Pipelines CLI
//!
//! Command-line interface for managing deployment pipelines: promoting
//! releases between stages, comparing stages, and wiring pipelines to GitHub.

mod api;
mod commands;
mod config;
mod prompt;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use pipelines_client::config::{DEFAULT_GITHUB_URL, DEFAULT_INTEGRATION_URL, DEFAULT_PLATFORM_URL};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::Api;

#[derive(Parser)]
#[command(name = "pipelines")]
#[command(about = "Manage deployment pipelines", long_about = None)]
struct Cli {
    /// Platform API token
    #[arg(long, env = "HEROKU_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// Platform API URL
    #[arg(long, env = "HEROKU_API_URL", default_value = DEFAULT_PLATFORM_URL)]
    api_url: String,

    /// Integration API URL
    #[arg(long, env = "KOLKRABBI_URL", default_value = DEFAULT_INTEGRATION_URL)]
    kolkrabbi_url: String,

    /// GitHub API URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_URL)]
    github_url: String,

    /// Seconds between promotion status checks
    #[arg(long, env = "PIPELINES_POLL_INTERVAL", default_value = "1")]
    poll_interval: u64,

    /// Give up waiting for a promotion after this many seconds
    #[arg(long, env = "PIPELINES_POLL_TIMEOUT")]
    poll_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            integration_url: self.kolkrabbi_url.clone(),
            github_url: self.github_url.clone(),
            poll_interval: Duration::from_secs(self.poll_interval),
            poll_timeout: self.poll_timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipelines=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;
    debug!(
        "Using platform={} integration={} github={}",
        config.api_url, config.integration_url, config.github_url
    );

    let api = Api::new(&config)?;
    handle_command(cli.command, &api).await
}
