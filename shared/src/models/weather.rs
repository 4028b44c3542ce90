//! Weather data models

use serde::{Deserialize, Serialize};

/// How serious a derived alert is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    None,
    Low,
    Moderate,
    High,
}

/// Weather alert computed from forecast thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAlert {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: AlertSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub details: String,
}

impl WeatherAlert {
    pub fn new(
        alert_type: impl Into<String>,
        severity: AlertSeverity,
        date: &str,
        details: impl Into<String>,
    ) -> Self {
        Self {
            alert_type: alert_type.into(),
            severity,
            date: Some(date.to_string()),
            details: details.into(),
        }
    }

    /// Placeholder returned when nothing crosses a threshold
    pub fn none() -> Self {
        Self {
            alert_type: "No Alerts".to_string(),
            severity: AlertSeverity::None,
            date: None,
            details: "No weather alerts for this location.".to_string(),
        }
    }
}

/// Daily block of an Open-Meteo forecast, restricted to the alert inputs.
///
/// Every series is optional and may contain `null`s; Open-Meteo omits
/// variables it cannot compute for a location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_gusts_10m_max: Vec<Option<f64>>,
}

impl DailyForecast {
    pub fn days(&self) -> usize {
        self.time.len()
    }
}

/// Value at `index` in a nullable series
pub(crate) fn at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_wire_format() {
        let alert = WeatherAlert::new(
            "High Winds",
            AlertSeverity::Moderate,
            "2025-01-02",
            "High winds of 65km/h expected.",
        );
        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["type"], "High Winds");
        assert_eq!(value["severity"], "Moderate");
        assert_eq!(value["date"], "2025-01-02");
    }

    #[test]
    fn test_no_alert_has_no_date() {
        let value = serde_json::to_value(WeatherAlert::none()).unwrap();
        assert_eq!(value["severity"], "None");
        assert!(value.get("date").is_none());
    }

    #[test]
    fn test_daily_forecast_tolerates_nulls() {
        let daily: DailyForecast = serde_json::from_value(json!({
            "time": ["2025-01-01"],
            "temperature_2m_max": [null],
            "weather_code": [3]
        }))
        .unwrap();
        assert_eq!(daily.days(), 1);
        assert_eq!(at(&daily.temperature_2m_max, 0), None);
        assert_eq!(at(&daily.weather_code, 0), Some(3.0));
        assert_eq!(at(&daily.precipitation_sum, 0), None);
    }
}
