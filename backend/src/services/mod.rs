//! Business logic services for SpatialGPT

pub mod chat;
pub mod llm;
pub mod places;
pub mod prompts;
pub mod storage;
pub mod stream;
pub mod visualization;

pub use chat::ChatService;
pub use llm::{LanguageModel, ModelRegistry};
pub use places::PlacesService;
pub use storage::{BlobStore, LocalBlobStore, StoredBlob};
pub use visualization::VisualizationService;
