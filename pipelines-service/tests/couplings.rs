//! Coupling management and roster join

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::FakeHeroku;
use pipelines_service::{CouplingClient, PipelineError};
use uuid::Uuid;

fn client(fake: &FakeHeroku) -> CouplingClient {
    CouplingClient::new(Arc::new(fake.clone()))
}

#[tokio::test]
async fn test_empty_pipeline_skips_app_lookup() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");

    let apps = client(&fake).list_pipeline_apps(pipeline).await.unwrap();

    assert!(apps.is_empty());
    assert_eq!(fake.filter_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_single_app_roster() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    let app = fake.add_app(pipeline, "example", "production");

    let apps = client(&fake).list_pipeline_apps(pipeline).await.unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].id(), app);
    assert_eq!(apps[0].coupling.app.id, app);
    assert_eq!(apps[0].stage(), "production");
}

#[tokio::test]
async fn test_roster_joins_every_app_with_one_batched_lookup() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    let other = fake.add_pipeline("other");
    let staging = fake.add_app(pipeline, "example-staging", "staging");
    let production = fake.add_app(pipeline, "example", "production");
    let admin = fake.add_app(pipeline, "example-admin", "production");
    fake.add_app(other, "unrelated", "staging");

    let apps = client(&fake).list_pipeline_apps(pipeline).await.unwrap();

    assert_eq!(fake.filter_calls.load(Ordering::SeqCst), 1);
    let ids: Vec<Uuid> = apps.iter().map(|a| a.id()).collect();
    assert_eq!(ids, vec![staging, production, admin]);
    for app in &apps {
        assert_eq!(app.coupling.app.id, app.id());
        assert_eq!(app.coupling.pipeline.id, pipeline);
    }
}

#[tokio::test]
async fn test_coupling_without_app_is_an_error() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    fake.add_app(pipeline, "example", "production");
    let missing = fake.add_app(pipeline, "example-staging", "staging");
    fake.hide_app(missing);

    let err = client(&fake).list_pipeline_apps(pipeline).await.unwrap_err();

    assert!(matches!(err, PipelineError::RosterMismatch { pipeline_id, .. } if pipeline_id == pipeline));
}

#[tokio::test]
async fn test_app_without_coupling_is_an_error() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    fake.add_app(pipeline, "example", "production");
    let stray = fake.add_uncoupled_app("stray");
    fake.leak_app(stray);

    let err = client(&fake).list_pipeline_apps(pipeline).await.unwrap_err();

    let PipelineError::RosterMismatch { pipeline_id, detail } = err else {
        panic!("expected a roster mismatch");
    };
    assert_eq!(pipeline_id, pipeline);
    assert_eq!(detail, format!("app stray ({}) has no coupling", stray));
}

#[tokio::test]
async fn test_get_coupling_for_uncoupled_app() {
    let fake = FakeHeroku::new();
    fake.add_uncoupled_app("loner");

    let err = client(&fake).get_coupling("loner").await.unwrap_err();

    assert!(matches!(err, PipelineError::AppNotInPipeline { ref app } if app == "loner"));
    assert_eq!(
        err.to_string(),
        "This app (loner) does not seem to be a part of any pipeline"
    );
}

#[tokio::test]
async fn test_update_then_get_reflects_new_stage() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    fake.add_app(pipeline, "example-admin", "production");
    let couplings = client(&fake);

    let updated = couplings
        .update_coupling("example-admin", "staging")
        .await
        .unwrap();
    let fetched = couplings.get_coupling("example-admin").await.unwrap();

    assert_eq!(updated.stage, "staging");
    assert_eq!(fetched.stage, "staging");
    assert_eq!(fetched.id, updated.id);
}

#[tokio::test]
async fn test_custom_stage_is_kept_verbatim() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    let app = fake.add_uncoupled_app("example-canary");

    let coupling = client(&fake)
        .create_coupling(pipeline, "example-canary", "Canary")
        .await
        .unwrap();

    assert_eq!(coupling.stage, "Canary");
    assert_eq!(fake.stage_of(app).as_deref(), Some("Canary"));
}

#[tokio::test]
async fn test_remove_coupling() {
    let fake = FakeHeroku::new();
    let pipeline = fake.add_pipeline("example");
    let app = fake.add_app(pipeline, "example", "production");
    let couplings = client(&fake);

    let removed = couplings.remove_coupling("example").await.unwrap();

    assert_eq!(removed.app.id, app);
    assert_eq!(fake.stage_of(app), None);
    assert!(matches!(
        couplings.get_coupling("example").await,
        Err(PipelineError::AppNotInPipeline { .. })
    ));
}
