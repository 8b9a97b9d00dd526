//! Setup and connect commands
//!
//! Both take an optional pipeline name and repository and prompt for
//! whatever is missing.

use anyhow::Result;
use colored::*;
use pipelines_core::dto::integration::{AppLinkSettings, PullRequestSettings};
use pipelines_service::setup;

use super::action;
use crate::api::Api;
use crate::prompt;

const DASHBOARD_URL: &str = "https://dashboard.heroku.com/pipelines";

/// Pipeline name and repository, prompting for the missing ones
fn name_and_repo(name: Option<String>, repo: Option<String>) -> Result<(String, String)> {
    if let Some(name) = &name {
        setup::validate_pipeline_name(name)?;
    }
    if let Some(repo) = &repo {
        setup::validate_repo_name(repo)?;
    }

    let name = match name {
        Some(name) => name,
        None => prompt::pipeline_name()?,
    };
    let repo = match repo {
        Some(repo) => repo,
        None => prompt::repo_name()?,
    };

    Ok((setup::normalize_pipeline_name(&name), repo))
}

/// Connect a GitHub repository to an existing pipeline
pub async fn connect(api: &Api, name: Option<String>, repo: Option<String>) -> Result<()> {
    let client = api.setup();
    let token = client.github_token().await?;
    let (name, repo_name) = name_and_repo(name, repo)?;
    let repo = client.get_repo(&token, &repo_name).await?;

    let pipeline = prompt::resolve_pipeline(api.platform.as_ref(), &name).await?;

    action("Linking to repo", client.link_repository(pipeline.id, &repo)).await?;

    Ok(())
}

/// Create a pipeline with a production and a staging app built from a
/// GitHub repository
pub async fn setup(api: &Api, name: Option<String>, repo: Option<String>, yes: bool) -> Result<()> {
    let client = api.setup();
    let (name, repo_name) = name_and_repo(name, repo)?;
    let token = client.github_token().await?;
    let repo = client.get_repo(&token, &repo_name).await?;

    let pipeline = action(
        format!("Creating pipeline {}", name.bold()),
        client.create_pipeline(&name),
    )
    .await?;
    action("Linking to repo", client.link_repository(pipeline.id, &repo)).await?;

    let archive_url = client.archive_url(&token, &repo).await?;

    action(
        format!("Creating production app {}", name.bold()),
        client.create_app(&archive_url, &name, pipeline.id, "production"),
    )
    .await?;

    let staging_name = format!("{}-staging", name);
    let staging = action(
        format!("Creating staging app {}", staging_name.bold()),
        client.create_app(&archive_url, &staging_name, pipeline.id, "staging"),
    )
    .await?;

    let settings = if yes || !prompt::is_interactive() {
        default_settings()
    } else {
        prompt_settings(&repo.default_branch)?
    };
    action(
        "Configuring pipeline",
        client.configure_app_link(staging.id, settings),
    )
    .await?;

    if client.has_ci_flag().await {
        let enable_ci = yes
            || (prompt::is_interactive()
                && prompt::confirm("Enable automatic Heroku CI test runs?", true)?);
        if enable_ci {
            action("Enabling Heroku CI", client.set_ci(pipeline.id, true)).await?;
        }
    }

    println!("{}/{}", DASHBOARD_URL, pipeline.id);
    Ok(())
}

/// Settings used with `--yes`
fn default_settings() -> AppLinkSettings {
    AppLinkSettings {
        auto_deploy: Some(true),
        wait_for_ci: Some(true),
        pull_requests: Some(PullRequestSettings {
            enabled: true,
            auto_deploy: true,
            auto_destroy: true,
        }),
    }
}

fn prompt_settings(branch: &str) -> Result<AppLinkSettings> {
    let auto_deploy = prompt::confirm(
        &format!("Automatically deploy the {} branch to staging?", branch),
        true,
    )?;
    let wait_for_ci = auto_deploy
        && prompt::confirm(
            &format!(
                "Wait for CI to pass before deploying the {} branch to staging?",
                branch
            ),
            true,
        )?;

    let enabled = prompt::confirm("Enable review apps?", true)?;
    let pull_requests = if enabled {
        PullRequestSettings {
            enabled,
            auto_deploy: prompt::confirm("Automatically create review apps for every PR?", true)?,
            auto_destroy: prompt::confirm(
                "Automatically destroy idle review apps after 5 days?",
                true,
            )?,
        }
    } else {
        PullRequestSettings::default()
    };

    Ok(AppLinkSettings {
        auto_deploy: Some(auto_deploy),
        wait_for_ci: Some(wait_for_ci),
        pull_requests: Some(pull_requests),
    })
}
