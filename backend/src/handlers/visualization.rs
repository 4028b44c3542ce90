//! Visualization data endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use shared::{
    Coordinate, DateRange, PrecipitationUnit, TemperatureUnit, Units, VisualizationQuery,
    VisualizationType, WindUnit,
};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Query parameters for a visualization panel
#[derive(Debug, Deserialize)]
pub struct VisualizationParams {
    pub latitude: f64,
    pub longitude: f64,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub temperature: Option<TemperatureUnit>,
    pub wind: Option<WindUnit>,
    pub precipitation: Option<PrecipitationUnit>,
}

impl VisualizationParams {
    /// Missing dates fall back to the type's default window
    pub fn into_query(
        self,
        visualization_type: VisualizationType,
        today: NaiveDate,
    ) -> VisualizationQuery {
        let default_range = visualization_type.default_date_range(today);
        let defaults = Units::default();

        VisualizationQuery {
            coordinate: Coordinate::new(self.latitude, self.longitude),
            date_range: DateRange::new(
                self.from.unwrap_or(default_range.from),
                self.to.unwrap_or(default_range.to),
            ),
            units: Units {
                temperature: self.temperature.unwrap_or(defaults.temperature),
                wind: self.wind.unwrap_or(defaults.wind),
                precipitation: self.precipitation.unwrap_or(defaults.precipitation),
            },
            visualization_type,
        }
    }
}

/// Fetch the data behind one drawer panel
pub async fn get_visualization(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<VisualizationParams>,
) -> AppResult<Json<Value>> {
    let visualization_type = VisualizationType::from_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Visualization type {}", slug)))?;
    let query = params.into_query(visualization_type, Utc::now().date_naive());
    let data = state.visualization.fetch(&query).await?;
    Ok(Json(data))
}
