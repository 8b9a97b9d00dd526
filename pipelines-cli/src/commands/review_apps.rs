//! Review apps command

use anyhow::Result;
use colored::*;
use pipelines_core::dto::integration::AppLinkSettings;
use pipelines_service::setup::review_app_settings;

use super::action;
use crate::api::Api;
use crate::prompt;

/// `review-apps` switches
pub struct Flags {
    pub enable: bool,
    pub disable: bool,
    pub autodeploy: bool,
    pub autodestroy: bool,
}

pub async fn review_apps(api: &Api, reference: &str, app: &str, flags: Flags) -> Result<()> {
    let settings = review_app_settings(
        flags.enable,
        flags.disable,
        flags.autodeploy,
        flags.autodestroy,
    )?;
    let pipeline = prompt::resolve_pipeline(api.platform.as_ref(), reference).await?;

    if settings.enabled {
        eprintln!("Enabling review apps for {} ...", pipeline.name.bold());
        if !settings.auto_deploy && !settings.auto_destroy {
            eprintln!("Using default settings ...");
        }
        if settings.auto_deploy {
            eprintln!("Enabling auto deployment ...");
        }
        if settings.auto_destroy {
            eprintln!("Enabling auto destroy ...");
        }
    } else {
        eprintln!("Disabling review apps for {} ...", pipeline.name.bold());
    }

    let client = api.setup();
    let app = client.get_app(app).await?;
    action(
        "Configuring pipeline",
        client.configure_app_link(app.id, AppLinkSettings::review_apps(settings)),
    )
    .await?;

    Ok(())
}
