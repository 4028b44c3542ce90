//! Place search and POI endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use shared::{Coordinate, PlaceResult, PoiCategory, PoiResult};

use crate::error::AppResult;
use crate::AppState;

const DEFAULT_POI_RADIUS: u32 = 1000;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CoordinateQuery {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct PoiQuery {
    pub category: String,
    pub radius: Option<u32>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Forward place search
pub async fn search_places(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<PlaceResult>>> {
    let results = state.places.search(&query.q).await?;
    Ok(Json(results))
}

/// Reverse geocode a point
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> AppResult<Json<Value>> {
    let place = state
        .places
        .reverse(Coordinate::new(query.latitude, query.longitude))
        .await?;
    Ok(Json(place))
}

/// Full record for a place
pub async fn place_details(
    State(state): State<AppState>,
    Path(place_id): Path<u64>,
) -> AppResult<Json<Value>> {
    let details = state.places.details(place_id).await?;
    Ok(Json(details))
}

/// POIs of one category around a point, nearest first
pub async fn search_poi(
    State(state): State<AppState>,
    Query(query): Query<PoiQuery>,
) -> AppResult<Json<Vec<PoiResult>>> {
    let results = state
        .places
        .poi(
            &query.category,
            query.radius.unwrap_or(DEFAULT_POI_RADIUS),
            Coordinate::new(query.latitude, query.longitude),
        )
        .await?;
    Ok(Json(results))
}

/// List the searchable POI categories
pub async fn poi_categories(State(state): State<AppState>) -> Json<&'static [PoiCategory]> {
    Json(state.places.categories())
}
