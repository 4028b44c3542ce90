//! Route definitions for SpatialGPT

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/files/upload", post(handlers::upload_file))
        .route("/visualizations/:visualization_type", get(handlers::get_visualization))
        .nest("/places", place_routes())
        .nest("/poi", poi_routes())
}

/// Geocoding routes
fn place_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search_places))
        .route("/reverse", get(handlers::reverse_geocode))
        .route("/:place_id", get(handlers::place_details))
}

/// Point-of-interest routes
fn poi_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::search_poi))
        .route("/categories", get(handlers::poi_categories))
}
