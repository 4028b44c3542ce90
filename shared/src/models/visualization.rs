//! Visualization drawer models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Coordinate, DateRange, Units};

/// Data category shown in the visualization drawer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationType {
    #[default]
    WeatherForecast,
    WeatherHistory,
    AirQuality,
    ClimateChange,
    Marine,
    Flood,
    SolarRadiation,
    EnsembleModels,
}

impl VisualizationType {
    pub const ALL: [VisualizationType; 8] = [
        VisualizationType::WeatherForecast,
        VisualizationType::WeatherHistory,
        VisualizationType::AirQuality,
        VisualizationType::ClimateChange,
        VisualizationType::Marine,
        VisualizationType::Flood,
        VisualizationType::SolarRadiation,
        VisualizationType::EnsembleModels,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            VisualizationType::WeatherForecast => "weather-forecast",
            VisualizationType::WeatherHistory => "weather-history",
            VisualizationType::AirQuality => "air-quality",
            VisualizationType::ClimateChange => "climate-change",
            VisualizationType::Marine => "marine",
            VisualizationType::Flood => "flood",
            VisualizationType::SolarRadiation => "solar-radiation",
            VisualizationType::EnsembleModels => "ensemble-models",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }

    /// Drawer heading and context menu label
    pub fn title(&self) -> &'static str {
        match self {
            VisualizationType::WeatherForecast => "Weather Forecast",
            VisualizationType::WeatherHistory => "Historical Weather",
            VisualizationType::AirQuality => "Air Quality",
            VisualizationType::ClimateChange => "Climate Change",
            VisualizationType::Marine => "Marine Forecast",
            VisualizationType::Flood => "Flood Forecast",
            VisualizationType::SolarRadiation => "Solar Radiation",
            VisualizationType::EnsembleModels => "Ensemble Models",
        }
    }

    /// date-fns style pattern the date picker shows for this type
    pub fn date_format(&self) -> &'static str {
        match self {
            VisualizationType::ClimateChange => "yyyy",
            VisualizationType::Flood => "MMM yyyy",
            _ => "MMM d, yyyy",
        }
    }

    /// Default window shown when the tab is selected
    pub fn default_date_range(&self, today: NaiveDate) -> DateRange {
        match self {
            VisualizationType::WeatherForecast
            | VisualizationType::Marine
            | VisualizationType::EnsembleModels => DateRange::around(today, 0, 7),
            VisualizationType::WeatherHistory => DateRange::around(today, 14, 0),
            VisualizationType::AirQuality => DateRange::around(today, 5, 2),
            VisualizationType::ClimateChange => DateRange::new(
                NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or(today),
                NaiveDate::from_ymd_opt(2050, 12, 31).unwrap_or(today),
            ),
            VisualizationType::Flood => DateRange::around(today, 30, 90),
            VisualizationType::SolarRadiation => DateRange::around(today, 0, 1),
        }
    }

    /// Seconds a fetched result stays fresh
    pub fn stale_time_secs(&self) -> u64 {
        match self {
            VisualizationType::WeatherHistory | VisualizationType::Flood => 60 * 60,
            VisualizationType::ClimateChange => 60 * 60 * 24,
            _ => 60 * 15,
        }
    }

    pub fn uses_temperature_unit(&self) -> bool {
        matches!(
            self,
            VisualizationType::WeatherForecast
                | VisualizationType::WeatherHistory
                | VisualizationType::ClimateChange
                | VisualizationType::EnsembleModels
        )
    }

    pub fn uses_wind_and_precipitation_units(&self) -> bool {
        matches!(
            self,
            VisualizationType::WeatherForecast | VisualizationType::WeatherHistory
        )
    }
}

impl std::fmt::Display for VisualizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Everything a visualization panel fetches by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationQuery {
    pub coordinate: Coordinate,
    pub date_range: DateRange,
    pub units: Units,
    pub visualization_type: VisualizationType,
}

impl VisualizationQuery {
    /// Cache key built only from the fields the panel's fetch depends on
    pub fn cache_key(&self) -> String {
        let (from, to) = self.date_range.to_query_dates();
        let mut key = format!(
            "{}|{}|{}|{}|{}",
            self.visualization_type.slug(),
            self.coordinate.latitude,
            self.coordinate.longitude,
            from,
            to
        );
        if self.visualization_type.uses_temperature_unit() {
            key.push('|');
            key.push_str(self.units.temperature.as_str());
        }
        if self.visualization_type.uses_wind_and_precipitation_units() {
            key.push('|');
            key.push_str(self.units.wind.as_str());
            key.push('|');
            key.push_str(self.units.precipitation.as_str());
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TemperatureUnit, WindUnit};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_slug_round_trip() {
        for t in VisualizationType::ALL {
            assert_eq!(VisualizationType::from_slug(t.slug()), Some(t));
        }
        assert_eq!(VisualizationType::from_slug("tides"), None);
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&VisualizationType::SolarRadiation).unwrap();
        assert_eq!(json, "\"solar-radiation\"");
    }

    #[test]
    fn test_climate_change_is_multi_decade() {
        let range = VisualizationType::ClimateChange.default_date_range(today());
        assert_eq!(range.from, NaiveDate::from_ymd_opt(1950, 1, 1).unwrap());
        assert_eq!(range.to, NaiveDate::from_ymd_opt(2050, 12, 31).unwrap());
        assert!(range.days() > 365 * 30);
    }

    #[test]
    fn test_solar_radiation_is_one_day() {
        let range = VisualizationType::SolarRadiation.default_date_range(today());
        assert_eq!(range.from, today());
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn test_default_windows() {
        let t = today();
        let history = VisualizationType::WeatherHistory.default_date_range(t);
        assert_eq!((history.days(), history.to), (14, t));

        let air = VisualizationType::AirQuality.default_date_range(t);
        assert_eq!(air.from, t - chrono::Duration::days(5));
        assert_eq!(air.to, t + chrono::Duration::days(2));

        let flood = VisualizationType::Flood.default_date_range(t);
        assert_eq!(flood.days(), 120);
    }

    #[test]
    fn test_cache_key_ignores_unused_units() {
        let base = VisualizationQuery {
            coordinate: Coordinate::new(1.0, 2.0),
            date_range: VisualizationType::Marine.default_date_range(today()),
            units: Units::default(),
            visualization_type: VisualizationType::Marine,
        };
        let mut other = base.clone();
        other.units.temperature = TemperatureUnit::Fahrenheit;
        assert_eq!(base.cache_key(), other.cache_key());

        let mut forecast = base.clone();
        forecast.visualization_type = VisualizationType::WeatherForecast;
        let mut forecast_kn = forecast.clone();
        forecast_kn.units.wind = WindUnit::Kn;
        assert_ne!(forecast.cache_key(), forecast_kn.cache_key());
    }

    #[test]
    fn test_stale_times() {
        assert_eq!(VisualizationType::WeatherForecast.stale_time_secs(), 900);
        assert_eq!(VisualizationType::Flood.stale_time_secs(), 3600);
        assert_eq!(VisualizationType::ClimateChange.stale_time_secs(), 86400);
    }
}
