//! Release and slug domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ResourceRef;

/// A versioned record of a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: Uuid,
    pub version: u64,
    #[serde(default)]
    pub slug: Option<ResourceRef>,
}

/// An immutable deployable build artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slug {
    pub id: Uuid,
    #[serde(default)]
    pub commit: Option<String>,
}

/// Pick the latest release that carries a slug
///
/// Releases without a slug (config changes, add-on attachments) cannot be
/// promoted or diffed and are skipped.
pub fn latest_with_slug(releases: &[Release]) -> Option<&Release> {
    releases
        .iter()
        .filter(|r| r.slug.is_some())
        .max_by_key(|r| r.version)
}
