//! Pipelines Core
//!
//! Core types and abstractions for the pipelines CLI.
//!
//! This crate contains:
//! - Domain types: remote resources as the platform returns them (Pipeline, App, Coupling, etc.)
//! - DTOs: request bodies sent to the platform, integration and GitHub APIs
//! - Stages: the promotion order and stage inference rules

pub mod domain;
pub mod dto;
pub mod stage;

pub use stage::StageModel;
