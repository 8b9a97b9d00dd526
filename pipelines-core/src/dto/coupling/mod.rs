//! Coupling DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to couple an app to a pipeline at a stage
///
/// The platform takes bare ids here, not `{ "id": ... }` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCoupling {
    pub app: String,
    pub pipeline: Uuid,
    pub stage: String,
}

/// Request to move an existing coupling to another stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCoupling {
    pub stage: String,
}
