//! Data Transfer Objects
//!
//! Request bodies sent to the remote APIs. Responses are parsed straight
//! into the domain types.

pub mod app;
pub mod coupling;
pub mod integration;
pub mod pipeline;
pub mod promotion;
