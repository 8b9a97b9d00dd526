//! CI command handlers

use anyhow::Result;
use clap::Subcommand;

use super::action;
use crate::api::Api;
use crate::prompt;

/// CI subcommands
#[derive(Subcommand)]
pub enum CiCommands {
    /// Enable CI on an existing pipeline
    Enable {
        /// Pipeline name or id
        #[arg(short, long)]
        pipeline: String,
    },
    /// Disable CI on an existing pipeline
    Disable {
        /// Pipeline name or id
        #[arg(short, long)]
        pipeline: String,
    },
}

pub async fn handle_ci_command(command: CiCommands, api: &Api) -> Result<()> {
    let (reference, enabled) = match command {
        CiCommands::Enable { pipeline } => (pipeline, true),
        CiCommands::Disable { pipeline } => (pipeline, false),
    };

    let pipeline = prompt::resolve_pipeline(api.platform.as_ref(), &reference).await?;
    let message = if enabled { "Enabling CI" } else { "Disabling CI" };

    action(message, api.setup().set_ci(pipeline.id, enabled)).await?;
    Ok(())
}
