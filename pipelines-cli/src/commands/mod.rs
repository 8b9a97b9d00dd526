//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod ci;
mod coupling;
mod diff;
mod info;
mod promote;
mod review_apps;
mod setup;

pub use ci::CiCommands;

use std::fmt::Display;
use std::future::Future;
use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::api::Api;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Promote the latest release of an app to its downstream app(s)
    Promote {
        /// App to promote from
        #[arg(short, long)]
        app: String,

        /// Comma separated list of apps to promote to, instead of the next stage
        #[arg(short, long, value_delimiter = ',')]
        to: Vec<String>,
    },
    /// Compare the latest release of an app with its downstream app(s)
    Diff {
        /// App to compare from
        #[arg(short, long)]
        app: String,
    },
    /// Show the apps of a pipeline grouped by stage
    Info {
        /// Pipeline name or id
        pipeline: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Show the owner of every app
        #[arg(long)]
        with_owners: bool,
    },
    /// Add an app to a pipeline
    Add {
        /// Pipeline name or id
        pipeline: String,

        /// App to add
        #[arg(short, long)]
        app: String,

        /// Stage of the app (prompted when omitted)
        #[arg(short, long)]
        stage: Option<String>,
    },
    /// Move an app to another stage of its pipeline
    Update {
        /// App to move
        #[arg(short, long)]
        app: String,

        /// New stage of the app
        #[arg(short, long)]
        stage: String,
    },
    /// Remove an app from its pipeline
    Remove {
        /// App to remove
        #[arg(short, long)]
        app: String,
    },
    /// Create a pipeline containing an app
    Create {
        /// Name of the pipeline
        name: String,

        /// First app of the pipeline
        #[arg(short, long)]
        app: String,

        /// Stage of the app (prompted when omitted)
        #[arg(short, long)]
        stage: Option<String>,
    },
    /// Connect a GitHub repository to an existing pipeline
    Connect {
        /// Name of the pipeline
        name: Option<String>,

        /// GitHub repository (owner/name)
        repo: Option<String>,
    },
    /// Bootstrap a new pipeline with a production and a staging app
    Setup {
        /// Name of the pipeline
        name: Option<String>,

        /// GitHub repository (owner/name)
        repo: Option<String>,

        /// Accept the default settings instead of prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Enable or disable review apps for a pipeline
    ReviewApps {
        /// Pipeline name or id
        pipeline: String,

        /// App whose GitHub link carries the review app settings
        #[arg(short, long)]
        app: String,

        #[arg(short, long)]
        enable: bool,

        #[arg(short, long)]
        disable: bool,

        /// Create a review app for every pull request
        #[arg(long)]
        autodeploy: bool,

        /// Destroy idle review apps
        #[arg(long)]
        autodestroy: bool,
    },
    /// Continuous integration settings
    Ci {
        #[command(subcommand)]
        command: CiCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, api: &Api) -> Result<()> {
    match command {
        Commands::Promote { app, to } => promote::promote(api, &app, &to).await,
        Commands::Diff { app } => diff::diff(api, &app).await,
        Commands::Info {
            pipeline,
            json,
            with_owners,
        } => info::info(api, &pipeline, json, with_owners).await,
        Commands::Add {
            pipeline,
            app,
            stage,
        } => coupling::add(api, &pipeline, &app, stage).await,
        Commands::Update { app, stage } => coupling::update(api, &app, &stage).await,
        Commands::Remove { app } => coupling::remove(api, &app).await,
        Commands::Create { name, app, stage } => coupling::create(api, &name, &app, stage).await,
        Commands::Connect { name, repo } => setup::connect(api, name, repo).await,
        Commands::Setup { name, repo, yes } => setup::setup(api, name, repo, yes).await,
        Commands::ReviewApps {
            pipeline,
            app,
            enable,
            disable,
            autodeploy,
            autodestroy,
        } => {
            review_apps::review_apps(
                api,
                &pipeline,
                &app,
                review_apps::Flags {
                    enable,
                    disable,
                    autodeploy,
                    autodestroy,
                },
            )
            .await
        }
        Commands::Ci { command } => ci::handle_ci_command(command, api).await,
    }
}

/// Run a step while showing `message... done` on stderr
async fn action<T, E, F>(message: impl Display, step: F) -> std::result::Result<T, E>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    eprint!("{}... ", message);
    let _ = std::io::stderr().flush();

    let result = step.await;
    match &result {
        Ok(_) => eprintln!("{}", "done".green()),
        Err(_) => eprintln!("{}", "!".red().bold()),
    }
    result
}

/// Print a header line
fn header(title: &str) {
    println!("{} {}", "===".bold(), title.bold());
}

/// Print `key: value` lines with the values aligned
fn styled_hash(rows: &[(String, String)]) {
    let width = rows.iter().map(|(k, _)| k.len() + 1).max().unwrap_or(0);
    for (key, value) in rows {
        println!("{:<width$}  {}", format!("{}:", key), value, width = width);
    }
}
