//! In-memory stand-ins for the platform, integration and GitHub APIs

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pipelines_client::{ClientError, IntegrationApi, PlatformApi, Result, SourceControlApi};
use pipelines_core::domain::ResourceRef;
use pipelines_core::domain::app::{App, AppOwner};
use pipelines_core::domain::coupling::Coupling;
use pipelines_core::domain::github::{
    AppLink, CommitAuthor, CommitDetail, Comparison, GitHubAccount, GitHubCommit, GitHubToken,
    Repository,
};
use pipelines_core::domain::pipeline::{AccountFeature, Pipeline, Team};
use pipelines_core::domain::promotion::{Promotion, PromotionSource, PromotionTarget, TargetStatus};
use pipelines_core::domain::release::{Release, Slug};
use pipelines_core::dto::app::{AppFilter, AppSetup, CreateAppSetup};
use pipelines_core::dto::coupling::{CreateCoupling, UpdateCoupling};
use pipelines_core::dto::integration::{
    AppLinkSettings, CreatePipelineRepository, PipelineRepositorySettings,
};
use pipelines_core::dto::pipeline::CreatePipeline;
use pipelines_core::dto::promotion::CreatePromotion;
use pipelines_service::{PollConfig, Poller};
use uuid::Uuid;

fn not_found() -> ClientError {
    ClientError::api_error(404, "Not found.")
}

/// Poller that does not slow tests down
pub fn fast_poller() -> Poller {
    Poller::new(PollConfig {
        interval: Duration::from_millis(1),
        max_attempts: Some(50),
        timeout: None,
    })
}

pub fn commit(sha: &str, message: &str) -> GitHubCommit {
    GitHubCommit {
        sha: sha.to_string(),
        commit: CommitDetail {
            author: CommitAuthor {
                name: "Jane Doe".to_string(),
                date: Utc.with_ymd_and_hms(2016, 5, 4, 12, 0, 0).unwrap(),
            },
            message: message.to_string(),
        },
    }
}

#[derive(Default)]
struct State {
    apps: Vec<App>,
    couplings: Vec<Coupling>,
    /// Apps the filter endpoint pretends not to know
    hidden_apps: Vec<Uuid>,
    /// Apps the filter endpoint returns whatever ids were asked for
    leaked_apps: Vec<Uuid>,
    releases: HashMap<String, Vec<Release>>,
    slugs: HashMap<Uuid, Slug>,
    pipelines: Vec<Pipeline>,
    teams: Vec<Team>,
    features: HashMap<String, bool>,
    /// Successive answers of the promotion-targets endpoint; the last repeats
    poll_script: VecDeque<Vec<PromotionTarget>>,
    promotions: Vec<CreatePromotion>,
    github_token: Option<String>,
    app_links: HashMap<Uuid, AppLinkSettings>,
    linked_repos: HashMap<Uuid, String>,
    repositories: HashMap<String, Repository>,
    pipeline_repositories: HashMap<Uuid, u64>,
    ci: HashMap<Uuid, bool>,
    /// Compare results keyed by `base...head`; missing keys answer 404
    comparisons: HashMap<String, Comparison>,
    app_setups: Vec<CreateAppSetup>,
}

/// Fake of all three remote APIs backed by shared in-memory state
#[derive(Clone, Default)]
pub struct FakeHeroku {
    state: Arc<Mutex<State>>,
    pub filter_calls: Arc<AtomicUsize>,
    pub poll_calls: Arc<AtomicUsize>,
    pub compare_calls: Arc<AtomicUsize>,
    pub integration_calls: Arc<AtomicUsize>,
}

impl FakeHeroku {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pipeline(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().pipelines.push(Pipeline {
            id,
            name: name.to_string(),
            owner: None,
        });
        id
    }

    pub fn set_pipeline(&self, pipeline: Pipeline) {
        self.state.lock().unwrap().pipelines.push(pipeline);
    }

    /// Create an app coupled to `pipeline_id` at `stage`
    pub fn add_app(&self, pipeline_id: Uuid, name: &str, stage: &str) -> Uuid {
        let id = self.add_uncoupled_app(name);
        self.state.lock().unwrap().couplings.push(Coupling {
            id: Uuid::new_v4(),
            app: ResourceRef {
                id,
                name: Some(name.to_string()),
            },
            pipeline: ResourceRef::new(pipeline_id),
            stage: stage.to_string(),
        });
        id
    }

    pub fn add_uncoupled_app(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().apps.push(App {
            id,
            name: name.to_string(),
            owner: None,
        });
        id
    }

    pub fn set_app_owner(&self, app_id: Uuid, owner_id: Uuid, email: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(app) = state.apps.iter_mut().find(|a| a.id == app_id) {
            app.owner = Some(AppOwner {
                id: owner_id,
                email: Some(email.to_string()),
            });
        }
    }

    /// Make the filter endpoint omit an app that still has a coupling
    pub fn hide_app(&self, app_id: Uuid) {
        self.state.lock().unwrap().hidden_apps.push(app_id);
    }

    /// Make the filter endpoint also return an app nobody asked for
    pub fn leak_app(&self, app_id: Uuid) {
        self.state.lock().unwrap().leaked_apps.push(app_id);
    }

    /// Give an app a release whose slug was built from `commit`
    pub fn set_release(&self, app: &str, version: u64, commit: &str) {
        let slug_id = Uuid::new_v4();
        let mut state = self.state.lock().unwrap();
        state.slugs.insert(
            slug_id,
            Slug {
                id: slug_id,
                commit: Some(commit.to_string()),
            },
        );
        state
            .releases
            .entry(app.to_string())
            .or_default()
            .push(Release {
                id: Uuid::new_v4(),
                version,
                slug: Some(ResourceRef::new(slug_id)),
            });
    }

    pub fn add_team(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().teams.push(Team {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn set_feature(&self, name: &str, enabled: bool) {
        self.state
            .lock()
            .unwrap()
            .features
            .insert(name.to_string(), enabled);
    }

    /// Queue the answer of the next promotion-targets poll
    pub fn push_poll(&self, targets: Vec<(Uuid, TargetStatus, Option<&str>)>) {
        let targets = targets
            .into_iter()
            .map(|(id, status, message)| PromotionTarget {
                app: ResourceRef::new(id),
                status,
                error_message: message.map(str::to_string),
            })
            .collect();
        self.state.lock().unwrap().poll_script.push_back(targets);
    }

    pub fn connect_github(&self, token: &str) {
        self.state.lock().unwrap().github_token = Some(token.to_string());
    }

    pub fn link_app(&self, app_id: Uuid, repo: &str) {
        self.state
            .lock()
            .unwrap()
            .linked_repos
            .insert(app_id, repo.to_string());
    }

    pub fn add_repository(&self, name: &str, id: u64, default_branch: &str) {
        self.state.lock().unwrap().repositories.insert(
            name.to_string(),
            Repository {
                id,
                name: name.to_string(),
                default_branch: default_branch.to_string(),
            },
        );
    }

    pub fn set_comparison(&self, base: &str, head: &str, comparison: Comparison) {
        self.state
            .lock()
            .unwrap()
            .comparisons
            .insert(format!("{}...{}", base, head), comparison);
    }

    pub fn promotions(&self) -> Vec<CreatePromotion> {
        self.state.lock().unwrap().promotions.clone()
    }

    pub fn app_setups(&self) -> Vec<CreateAppSetup> {
        self.state.lock().unwrap().app_setups.clone()
    }

    pub fn app_link(&self, app_id: Uuid) -> Option<AppLinkSettings> {
        self.state.lock().unwrap().app_links.get(&app_id).cloned()
    }

    pub fn pipeline_repository(&self, pipeline_id: Uuid) -> Option<u64> {
        self.state
            .lock()
            .unwrap()
            .pipeline_repositories
            .get(&pipeline_id)
            .copied()
    }

    pub fn ci(&self, pipeline_id: Uuid) -> Option<bool> {
        self.state.lock().unwrap().ci.get(&pipeline_id).copied()
    }

    pub fn stage_of(&self, app_id: Uuid) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .couplings
            .iter()
            .find(|c| c.app.id == app_id)
            .map(|c| c.stage.clone())
    }

    fn find_app(state: &State, app: &str) -> Option<App> {
        state
            .apps
            .iter()
            .find(|a| a.name == app || a.id.to_string() == app)
            .cloned()
    }
}

#[async_trait]
impl PlatformApi for FakeHeroku {
    async fn get_coupling(&self, app: &str) -> Result<Coupling> {
        let state = self.state.lock().unwrap();
        let app = Self::find_app(&state, app).ok_or_else(not_found)?;
        state
            .couplings
            .iter()
            .find(|c| c.app.id == app.id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn list_pipeline_couplings(&self, pipeline_id: Uuid) -> Result<Vec<Coupling>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .couplings
            .iter()
            .filter(|c| c.pipeline.id == pipeline_id)
            .cloned()
            .collect())
    }

    async fn create_coupling(&self, req: CreateCoupling) -> Result<Coupling> {
        let mut state = self.state.lock().unwrap();
        let app = Self::find_app(&state, &req.app).ok_or_else(not_found)?;
        let coupling = Coupling {
            id: Uuid::new_v4(),
            app: ResourceRef {
                id: app.id,
                name: Some(app.name),
            },
            pipeline: ResourceRef::new(req.pipeline),
            stage: req.stage,
        };
        state.couplings.push(coupling.clone());
        Ok(coupling)
    }

    async fn update_coupling(&self, coupling_id: Uuid, req: UpdateCoupling) -> Result<Coupling> {
        let mut state = self.state.lock().unwrap();
        let coupling = state
            .couplings
            .iter_mut()
            .find(|c| c.id == coupling_id)
            .ok_or_else(not_found)?;
        coupling.stage = req.stage;
        Ok(coupling.clone())
    }

    async fn delete_coupling(&self, coupling_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.couplings.len();
        state.couplings.retain(|c| c.id != coupling_id);
        if state.couplings.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn get_app(&self, app: &str) -> Result<App> {
        let state = self.state.lock().unwrap();
        Self::find_app(&state, app).ok_or_else(not_found)
    }

    async fn filter_apps(&self, filter: AppFilter) -> Result<Vec<App>> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        // Answer in the reverse of storage order, like an unordered backend
        Ok(state
            .apps
            .iter()
            .rev()
            .filter(|a| {
                (filter.within.id.contains(&a.id) || state.leaked_apps.contains(&a.id))
                    && !state.hidden_apps.contains(&a.id)
            })
            .cloned()
            .collect())
    }

    async fn create_app_setup(&self, req: CreateAppSetup) -> Result<AppSetup> {
        let id = Uuid::new_v4();
        let mut state = self.state.lock().unwrap();
        state.apps.push(App {
            id,
            name: req.app.name.clone(),
            owner: None,
        });
        state.app_setups.push(req.clone());
        Ok(AppSetup {
            id: Uuid::new_v4(),
            app: ResourceRef {
                id,
                name: Some(req.app.name),
            },
        })
    }

    async fn list_releases(&self, app: &str) -> Result<Vec<Release>> {
        let state = self.state.lock().unwrap();
        let mut releases = state.releases.get(app).cloned().unwrap_or_default();
        releases.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(releases)
    }

    async fn get_slug(&self, _app: &str, slug_id: Uuid) -> Result<Slug> {
        self.state
            .lock()
            .unwrap()
            .slugs
            .get(&slug_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn find_pipelines(&self, name: &str) -> Result<Vec<Pipeline>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .pipelines
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect())
    }

    async fn get_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline> {
        self.state
            .lock()
            .unwrap()
            .pipelines
            .iter()
            .find(|p| p.id == pipeline_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_pipeline(&self, req: CreatePipeline) -> Result<Pipeline> {
        let pipeline = Pipeline {
            id: Uuid::new_v4(),
            name: req.name,
            owner: None,
        };
        self.state.lock().unwrap().pipelines.push(pipeline.clone());
        Ok(pipeline)
    }

    async fn create_promotion(&self, req: CreatePromotion) -> Result<Promotion> {
        let source = req.source.app.id;
        self.state.lock().unwrap().promotions.push(req);
        Ok(Promotion {
            id: Uuid::new_v4(),
            source: PromotionSource {
                app: ResourceRef::new(source),
            },
            status: Some("pending".to_string()),
        })
    }

    async fn list_promotion_targets(&self, _promotion_id: Uuid) -> Result<Vec<PromotionTarget>> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.poll_script.len() > 1 {
            Ok(state.poll_script.pop_front().unwrap_or_default())
        } else {
            Ok(state.poll_script.front().cloned().unwrap_or_default())
        }
    }

    async fn get_team(&self, team_id: Uuid) -> Result<Team> {
        self.state
            .lock()
            .unwrap()
            .teams
            .iter()
            .find(|t| t.id == team_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn get_account_feature(&self, name: &str) -> Result<AccountFeature> {
        self.state
            .lock()
            .unwrap()
            .features
            .get(name)
            .map(|enabled| AccountFeature {
                name: name.to_string(),
                enabled: *enabled,
            })
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl IntegrationApi for FakeHeroku {
    async fn get_github_account(&self) -> Result<GitHubAccount> {
        self.integration_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .github_token
            .clone()
            .map(|token| GitHubAccount {
                github: GitHubToken { token },
            })
            .ok_or_else(not_found)
    }

    async fn get_app_link(&self, app_id: Uuid) -> Result<AppLink> {
        self.integration_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .linked_repos
            .get(&app_id)
            .map(|repo| AppLink {
                repo: repo.clone(),
                auto_deploy: None,
                branch: None,
            })
            .ok_or_else(not_found)
    }

    async fn update_app_link(&self, app_id: Uuid, settings: AppLinkSettings) -> Result<()> {
        self.integration_calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().app_links.insert(app_id, settings);
        Ok(())
    }

    async fn create_pipeline_repository(
        &self,
        pipeline_id: Uuid,
        req: CreatePipelineRepository,
    ) -> Result<()> {
        self.integration_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .pipeline_repositories
            .insert(pipeline_id, req.repository);
        Ok(())
    }

    async fn update_pipeline_repository(
        &self,
        pipeline_id: Uuid,
        settings: PipelineRepositorySettings,
    ) -> Result<()> {
        self.integration_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if !state.pipeline_repositories.contains_key(&pipeline_id) {
            return Err(not_found());
        }
        state.ci.insert(pipeline_id, settings.ci);
        Ok(())
    }
}

#[async_trait]
impl SourceControlApi for FakeHeroku {
    async fn get_repo(&self, _token: &str, repo: &str) -> Result<Repository> {
        self.state
            .lock()
            .unwrap()
            .repositories
            .get(repo)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn get_archive_url(&self, _token: &str, repo: &str, git_ref: &str) -> Result<String> {
        Ok(format!("https://codeload.example.com/{}/tar.gz/{}", repo, git_ref))
    }

    async fn compare(&self, _token: &str, _repo: &str, base: &str, head: &str) -> Result<Comparison> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .comparisons
            .get(&format!("{}...{}", base, head))
            .cloned()
            .ok_or_else(not_found)
    }
}
