//! Promotion domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ResourceRef;

/// A promotion of a source app's latest build to one or more targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: Uuid,
    pub source: PromotionSource,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionSource {
    pub app: ResourceRef,
}

/// Per-target state of a promotion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionTarget {
    pub app: ResourceRef,
    pub status: TargetStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl PromotionTarget {
    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Promotion target status
///
/// `Pending` moves to either terminal state exactly once; terminal states
/// never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Pending,
    Succeeded,
    Failed,
}

impl TargetStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TargetStatus::Pending)
    }
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetStatus::Pending => write!(f, "pending"),
            TargetStatus::Succeeded => write!(f, "succeeded"),
            TargetStatus::Failed => write!(f, "failed"),
        }
    }
}

/// True once no target is pending anymore
pub fn all_complete(targets: &[PromotionTarget]) -> bool {
    targets.iter().all(PromotionTarget::is_complete)
}
