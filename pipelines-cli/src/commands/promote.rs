//! Promote command

use anyhow::Result;
use colored::*;
use pipelines_core::domain::promotion::TargetStatus;
use pipelines_service::{PromotionResult, TargetOutcome, cancellation};
use tracing::debug;

use super::{action, styled_hash};
use crate::api::Api;

/// Promote the latest release of `app` and wait for every target
///
/// Ctrl-C stops the wait; the promotion itself keeps running on the platform.
pub async fn promote(api: &Api, app: &str, to: &[String]) -> Result<()> {
    let orchestrator = api.promotions();

    let plan = action("Fetching app info", orchestrator.plan(app, to)).await?;

    let destination = match &plan.target_stage {
        Some(stage) => stage.clone(),
        None => plan
            .targets
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", "),
    };
    let promotion = action(
        format!("Starting promotion to {}", destination),
        orchestrator.submit(&plan),
    )
    .await?;

    let (cancel, mut token) = cancellation();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling promotion wait");
            cancel.cancel();
        }
    });

    let report = action(
        "Waiting for promotion to complete",
        orchestrator.wait(&plan, promotion.id, &mut token),
    )
    .await;
    ctrl_c.abort();
    let report = report?;

    for outcome in &report.outcomes {
        print_outcome(plan.source.name(), outcome);
    }

    match report.result() {
        PromotionResult::Succeeded => {
            println!("{}", "Promotion successful".green());
            Ok(())
        }
        PromotionResult::PartialFailure { failed } => {
            eprintln!("{}", "Promotion to some apps failed".yellow());
            let rows: Vec<(String, String)> = failed
                .iter()
                .map(|t| {
                    (
                        t.app_name.clone(),
                        t.error_message.clone().unwrap_or_default(),
                    )
                })
                .collect();
            styled_hash(&rows);
            anyhow::bail!("Promotion failed for {} app(s)", failed.len())
        }
    }
}

fn print_outcome(source: &str, outcome: &TargetOutcome) {
    let status = match outcome.status {
        TargetStatus::Succeeded => outcome.status.to_string().green(),
        TargetStatus::Failed => outcome.status.to_string().red(),
        TargetStatus::Pending => outcome.status.to_string().yellow(),
    };
    println!(
        "  {} {} to {}: {}",
        "▸".cyan(),
        source,
        outcome.app_name.bold(),
        status
    );
}
