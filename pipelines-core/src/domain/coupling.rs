//! Coupling domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ResourceRef;

/// The record linking one app to one pipeline at one stage
///
/// At most one coupling exists per app per pipeline. The stage is kept as
/// the raw string the platform returned so custom stages survive untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupling {
    pub id: Uuid,
    pub app: ResourceRef,
    pub pipeline: ResourceRef,
    pub stage: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coupling_parses_platform_response() {
        let pipeline_id = Uuid::new_v4();
        let coupling: Coupling = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "app": { "id": Uuid::new_v4() },
            "pipeline": { "id": pipeline_id, "name": "example" },
            "stage": "staging",
            "created_at": "2016-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(coupling.pipeline.id, pipeline_id);
        assert_eq!(coupling.pipeline.name.as_deref(), Some("example"));
        assert!(coupling.app.name.is_none());
        assert_eq!(coupling.stage, "staging");
    }
}
