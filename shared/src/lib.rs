//! Shared types and state for SpatialGPT
//!
//! This crate holds the pieces used by both the backend server and the
//! browser (via WASM): the data model, annotation tables, alert derivation
//! and the client-side stores that tie the map, chat and drawer together.

pub mod alerts;
pub mod codes;
pub mod geo;
pub mod models;
pub mod store;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
