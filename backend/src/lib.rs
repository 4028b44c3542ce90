//! SpatialGPT backend
//!
//! Weather and geospatial chat assistant: an axum server that streams model
//! replies, runs weather and map tools against public providers, and serves
//! the data behind the visualization drawer.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod tools;

pub use crate::config::Config;
pub use error::{AppError, AppResult};

use services::{BlobStore, ChatService, PlacesService, VisualizationService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: ChatService,
    pub visualization: VisualizationService,
    pub places: PlacesService,
    pub blobs: Arc<dyn BlobStore>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let files = ServiceBuilder::new()
        .layer(middleware::from_fn(handlers::download_disposition))
        .service(ServeDir::new(&state.config.storage.upload_dir));
    let body_limit = DefaultBodyLimit::max(state.config.storage.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes())
        .nest_service("/files", files)
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
