//! Common types used across the platform

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// San Francisco, the initial map selection
    pub fn san_francisco() -> Self {
        Self::new(37.7749, -122.4194)
    }

    /// Berlin, the initial visualization drawer location
    pub fn berlin() -> Self {
        Self::new(52.52, 13.41)
    }

    pub fn is_northern_hemisphere(&self) -> bool {
        self.latitude >= 0.0
    }

    /// Four-decimal rendering used by the map overlay and context menu
    pub fn short_label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Latitude {}, Longitude {}",
            self.latitude, self.longitude
        )
    }
}

/// Pixel position of a click inside the map viewport
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Range of `before` days in the past to `after` days in the future
    pub fn around(today: NaiveDate, before: i64, after: i64) -> Self {
        Self {
            from: today - Duration::days(before),
            to: today + Duration::days(after),
        }
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days()
    }

    /// `YYYY-MM-DD` pair as expected by Open-Meteo `start_date`/`end_date`
    pub fn to_query_dates(&self) -> (String, String) {
        (
            self.from.format("%Y-%m-%d").to_string(),
            self.to.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

/// Wind speed unit preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

impl WindUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindUnit::Kmh => "kmh",
            WindUnit::Ms => "ms",
            WindUnit::Mph => "mph",
            WindUnit::Kn => "kn",
        }
    }
}

/// Precipitation unit preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl PrecipitationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }
}

/// Unit preferences for the visualization drawer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Units {
    pub temperature: TemperatureUnit,
    pub wind: WindUnit,
    pub precipitation: PrecipitationUnit,
}

/// Partial update for [`Units`]; `None` fields keep their current value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UnitsPatch {
    pub temperature: Option<TemperatureUnit>,
    pub wind: Option<WindUnit>,
    pub precipitation: Option<PrecipitationUnit>,
}

impl Units {
    pub fn merge(self, patch: UnitsPatch) -> Self {
        Self {
            temperature: patch.temperature.unwrap_or(self.temperature),
            wind: patch.wind.unwrap_or(self.wind),
            precipitation: patch.precipitation.unwrap_or(self.precipitation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate::new(37.77, -122.41);
        assert_eq!(c.to_string(), "Latitude 37.77, Longitude -122.41");
    }

    #[test]
    fn test_short_label_rounds_to_four_places() {
        let c = Coordinate::new(51.50741234, -0.12781234);
        assert_eq!(c.short_label(), "51.5074, -0.1278");
    }

    #[test]
    fn test_units_merge_is_partial() {
        let units = Units::default().merge(UnitsPatch {
            wind: Some(WindUnit::Kn),
            ..Default::default()
        });
        assert_eq!(units.temperature, TemperatureUnit::Celsius);
        assert_eq!(units.wind, WindUnit::Kn);
        assert_eq!(units.precipitation, PrecipitationUnit::Mm);
    }

    #[test]
    fn test_units_serialize_lowercase() {
        let json = serde_json::to_value(Units::default()).unwrap();
        assert_eq!(json["temperature"], "celsius");
        assert_eq!(json["wind"], "kmh");
        assert_eq!(json["precipitation"], "mm");
    }

    #[test]
    fn test_query_dates_format() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
        );
        assert_eq!(
            range.to_query_dates(),
            ("2024-03-01".to_string(), "2024-03-08".to_string())
        );
        assert_eq!(range.days(), 7);
    }
}
