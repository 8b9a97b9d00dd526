//! Pipeline workflows
//!
//! Coupling management, promotion, downstream diff and pipeline setup on top
//! of the API traits from `pipelines-client`. Nothing here prints: results
//! and errors are returned to the caller.

pub mod couplings;
pub mod diff;
pub mod error;
pub mod pipelines;
pub mod poll;
pub mod promotion;
pub mod setup;

pub use couplings::CouplingClient;
pub use diff::{AppCommit, AppDiff, CommitSummary, DiffEngine, DiffOutcome, DiffReport};
pub use error::{PipelineError, Result};
pub use pipelines::{PipelineMatch, describe_owner, find_pipeline};
pub use poll::{CancelHandle, CancelToken, PollConfig, Poller, cancellation};
pub use promotion::{
    PromotionOrchestrator, PromotionPlan, PromotionReport, PromotionResult, TargetOutcome,
};
pub use setup::SetupClient;
