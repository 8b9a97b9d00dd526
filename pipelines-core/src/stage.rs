//! Pipeline stages
//!
//! The promotion order (`development` → `staging` → `production`) and the
//! rules used to guess an app's stage from its name. `review` sits before the
//! ordered stages for ephemeral apps and never takes part in promotion.

use regex::Regex;

/// Stage of ephemeral review apps
pub const REVIEW: &str = "review";

/// An ordered stage and the app-name suffixes that suggest it
#[derive(Debug, Clone)]
pub struct StageRule {
    pub name: &'static str,
    infer: Regex,
}

/// Stage order and inference rules
///
/// An immutable value handed to the components that need it.
#[derive(Debug, Clone)]
pub struct StageModel {
    stages: Vec<StageRule>,
}

impl Default for StageModel {
    fn default() -> Self {
        let rule = |name, pattern: &str| StageRule {
            name,
            infer: Regex::new(pattern).expect("stage inference pattern is valid"),
        };

        Self {
            stages: vec![
                rule("development", r"-(dev|development|uat|tst|test|qa)$"),
                rule("staging", r"-(stg|staging)$"),
                rule("production", r"-(prd|prod|production|admin|demo)$"),
            ],
        }
    }
}

impl StageModel {
    /// Names of the ordered stages
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }

    /// `review` followed by the ordered stages
    pub fn all_stage_names(&self) -> Vec<&'static str> {
        std::iter::once(REVIEW).chain(self.names()).collect()
    }

    /// Position of a stage in the promotion order
    ///
    /// `review` and custom stages are not part of the order.
    pub fn position(&self, stage: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name == stage)
    }

    /// Stage name at a position of the promotion order
    pub fn at(&self, position: usize) -> Option<&'static str> {
        self.stages.get(position).map(|s| s.name)
    }

    /// The stage apps are promoted to from `stage`
    ///
    /// Returns `None` for stages outside the order and for the last stage.
    pub fn next(&self, stage: &str) -> Option<&'static str> {
        self.position(stage).and_then(|p| self.at(p + 1))
    }

    /// Guess a stage from an app name suffix (`-stg`, `-prod`, ...)
    pub fn infer(&self, app_name: &str) -> Option<&'static str> {
        self.stages
            .iter()
            .find(|s| s.infer.is_match(app_name))
            .map(|s| s.name)
    }
}
