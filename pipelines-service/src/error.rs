//! Error types for the pipeline workflows

use pipelines_client::ClientError;
use pipelines_core::domain::pipeline::Pipeline;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by the coupling, promotion and diff workflows
///
/// Components never print; the command layer turns these into messages
/// and a non-zero exit status.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Coupling lookup returned not-found
    #[error("This app ({app}) does not seem to be a part of any pipeline")]
    AppNotInPipeline { app: String },

    /// Source stage is outside the promotion order or is its last stage
    #[error("Cannot {action} {app} from '{stage}' stage")]
    InvalidSourceStage {
        action: &'static str,
        app: String,
        stage: String,
    },

    /// No app sits at the downstream stage
    #[error("Cannot {action} {app} as there are no downstream apps in {stage} stage")]
    NoDownstreamApps {
        action: &'static str,
        app: String,
        stage: String,
    },

    /// Explicit promotion target is not part of the pipeline
    #[error("Cannot find app {name} in the pipeline")]
    UnknownTarget { name: String },

    /// Explicit promotion target is the source app itself
    #[error("Cannot promote {app} to itself")]
    SelfPromotion { app: String },

    /// Explicit target list resolved to nothing
    #[error("At least one target app is required")]
    NoTargets,

    /// App has no release with a slug and commit
    #[error("No release found for {app}")]
    NoReleaseFound { app: String },

    /// Integration API reports the app has no linked repository
    #[error("The target app ({app}) needs to be connected to GitHub!")]
    GitHubNotConnected { app: String },

    /// Integration API reports the account has no GitHub link
    #[error("Account not connected to GitHub.")]
    GitHubAccountNotConnected,

    /// GitHub repository does not exist or is not visible
    #[error("Could not access {repo}")]
    RepositoryNotAccessible { repo: String },

    /// Apps and couplings of a pipeline do not join one to one
    #[error("Pipeline {pipeline_id} is inconsistent: {detail}")]
    RosterMismatch { pipeline_id: Uuid, detail: String },

    /// No pipeline with that name or id
    #[error("Pipeline not found: {0}")]
    PipelineNotFound(String),

    /// Several pipelines share the requested name
    #[error("Multiple pipelines named '{name}' found: {}", pipeline_ids(.candidates))]
    AmbiguousPipeline {
        name: String,
        candidates: Vec<Pipeline>,
    },

    /// User input failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Poll loop ran out of attempts or time
    #[error("Timed out waiting for promotion to complete after {attempts} attempt(s)")]
    PollTimedOut { attempts: u32 },

    /// Poll loop was cancelled by the caller
    #[error("Cancelled while waiting for promotion to complete")]
    Cancelled,

    /// Transport or API failure, surfaced verbatim
    #[error(transparent)]
    Client(#[from] ClientError),
}

fn pipeline_ids(candidates: &[Pipeline]) -> String {
    candidates
        .iter()
        .map(|p| p.id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_app_and_stage() {
        let err = PipelineError::InvalidSourceStage {
            action: "promote",
            app: "example".into(),
            stage: "production".into(),
        };
        assert_eq!(err.to_string(), "Cannot promote example from 'production' stage");

        let err = PipelineError::NoDownstreamApps {
            action: "diff",
            app: "example-staging".into(),
            stage: "production".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot diff example-staging as there are no downstream apps in production stage"
        );
    }

    #[test]
    fn test_ambiguous_pipeline_lists_ids() {
        let a = Pipeline {
            id: Uuid::new_v4(),
            name: "example".into(),
            owner: None,
        };
        let b = Pipeline {
            id: Uuid::new_v4(),
            name: "example".into(),
            owner: None,
        };
        let message = PipelineError::AmbiguousPipeline {
            name: "example".into(),
            candidates: vec![a.clone(), b.clone()],
        }
        .to_string();

        assert!(message.contains(&a.id.to_string()));
        assert!(message.contains(&b.id.to_string()));
    }

    #[test]
    fn test_client_errors_pass_through() {
        let err: PipelineError = ClientError::api_error(503, "Service Unavailable").into();
        assert_eq!(err.to_string(), "API error (status 503): Service Unavailable");
    }
}
