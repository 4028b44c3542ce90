//! Validation utilities for SpatialGPT inputs

use crate::types::{Coordinate, DateRange};

// ============================================================================
// Geographic Validations
// ============================================================================

/// Validate latitude is within [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate longitude is within [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

pub fn validate_coordinate(coordinate: &Coordinate) -> Result<(), &'static str> {
    validate_latitude(coordinate.latitude)?;
    validate_longitude(coordinate.longitude)
}

/// POI search radius in metres
pub fn validate_poi_radius(radius: u32) -> Result<(), &'static str> {
    if radius == 0 || radius > 50_000 {
        return Err("Radius must be between 1 and 50000 meters");
    }
    Ok(())
}

// ============================================================================
// Query Validations
// ============================================================================

/// Open-Meteo accepts 1 to 16 forecast days
pub fn validate_forecast_days(days: u32) -> Result<(), &'static str> {
    if !(1..=16).contains(&days) {
        return Err("Forecast days must be between 1 and 16");
    }
    Ok(())
}

pub fn validate_date_range(range: &DateRange) -> Result<(), &'static str> {
    if range.from > range.to {
        return Err("Start date must not be after end date");
    }
    Ok(())
}

/// Place searches need at least two non-blank characters
pub fn is_searchable_place_query(query: &str) -> bool {
    query.trim().chars().count() >= 2
}
