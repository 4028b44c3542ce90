//! Domain models for SpatialGPT

pub mod chat;
pub mod places;
pub mod visualization;
pub mod weather;

pub use chat::*;
pub use places::*;
pub use visualization::*;
pub use weather::*;
