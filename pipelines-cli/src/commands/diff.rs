//! Diff command

use anyhow::Result;
use colored::*;
use pipelines_service::{AppCommit, AppDiff, DiffOutcome, DiffReport};

use super::action;
use crate::api::Api;

pub async fn diff(api: &Api, app: &str) -> Result<()> {
    let engine = api.diffs();
    let report = action("Comparing releases", engine.diff(app)).await?;

    match report {
        DiffReport::AllUpToDate { .. } => {
            println!("\nEverything is up to date.");
        }
        DiffReport::Compared {
            source, results, ..
        } => {
            for result in &results {
                print_app_diff(&source, result);
            }
        }
    }

    Ok(())
}

fn print_app_diff(source: &AppCommit, result: &AppDiff) {
    let downstream = &result.app.app_name;

    match &result.outcome {
        DiffOutcome::UpToDate => {
            println!(
                "\neverything is up to date between {} and {}",
                source.app_name, downstream
            );
        }
        DiffOutcome::Ahead { ahead_by, commits } => {
            println!(
                "\n{} is ahead of {} by {} commit{}:",
                source.app_name.bold(),
                downstream.bold(),
                ahead_by,
                if *ahead_by == 1 { "" } else { "s" }
            );
            for commit in commits {
                println!(
                    "  {}  {}  {} ({})",
                    commit.short_sha.yellow(),
                    commit.date.format("%Y-%m-%dT%H:%M:%SZ"),
                    commit.message,
                    commit.author
                );
            }
        }
        DiffOutcome::Unavailable { reason } => {
            println!(
                "\n{}",
                format!(
                    "unable to perform a diff between {} and {}: {}",
                    source.app_name, downstream, reason
                )
                .red()
            );
        }
    }
}
