//! Core domain types
//!
//! This module contains the resources exchanged with the remote APIs.
//! The platform owns every one of them; the CLI only holds request-scoped
//! copies.

pub mod app;
pub mod coupling;
pub mod github;
pub mod pipeline;
pub mod promotion;
pub mod release;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to another resource embedded in a response
///
/// The platform embeds `{ "id": ..., "name": ... }` objects wherever one
/// resource points at another. The name is not always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ResourceRef {
    pub fn new(id: Uuid) -> Self {
        Self { id, name: None }
    }
}
