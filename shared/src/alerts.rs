//! Threshold-based weather alert derivation
//!
//! Alerts are recomputed from a forecast every time they are requested and
//! are never stored.

use crate::codes::severe_weather_description;
use crate::models::weather::{at, AlertSeverity, DailyForecast, WeatherAlert};

/// Thresholds that raise an alert when met or exceeded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// °C, inclusive upper bound
    pub high_temp: f64,
    /// °C, inclusive lower bound
    pub low_temp: f64,
    /// mm per day
    pub heavy_rain: f64,
    /// km/h
    pub high_winds: f64,
    /// km/h
    pub severe_wind_gusts: f64,
    /// percent
    pub high_precip_probability: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_temp: 35.0,
            low_temp: -10.0,
            heavy_rain: 20.0,
            high_winds: 60.0,
            severe_wind_gusts: 80.0,
            high_precip_probability: 80.0,
        }
    }
}

/// Derive alerts for every day in the forecast.
///
/// Returns the raw list, which is empty when nothing fires. Use
/// [`alerts_or_none`] for the user-facing list.
pub fn derive_alerts(daily: &DailyForecast, thresholds: &AlertThresholds) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();

    for (i, date) in daily.time.iter().enumerate() {
        if let Some(v) = at(&daily.temperature_2m_max, i).filter(|v| *v >= thresholds.high_temp) {
            alerts.push(WeatherAlert::new(
                "High Temperature",
                AlertSeverity::Moderate,
                date,
                format!("High temperature of {}°C expected.", v),
            ));
        }

        if let Some(v) = at(&daily.temperature_2m_min, i).filter(|v| *v <= thresholds.low_temp) {
            alerts.push(WeatherAlert::new(
                "Low Temperature",
                AlertSeverity::Moderate,
                date,
                format!("Low temperature of {}°C expected.", v),
            ));
        }

        if let Some(v) = at(&daily.precipitation_sum, i).filter(|v| *v >= thresholds.heavy_rain) {
            alerts.push(WeatherAlert::new(
                "Heavy Precipitation",
                AlertSeverity::Moderate,
                date,
                format!("Heavy precipitation of {}mm expected.", v),
            ));
        }

        if let Some(v) = at(&daily.wind_speed_10m_max, i).filter(|v| *v >= thresholds.high_winds) {
            alerts.push(WeatherAlert::new(
                "High Winds",
                AlertSeverity::Moderate,
                date,
                format!("High winds of {}km/h expected.", v),
            ));
        }

        if let Some(v) =
            at(&daily.wind_gusts_10m_max, i).filter(|v| *v >= thresholds.severe_wind_gusts)
        {
            alerts.push(WeatherAlert::new(
                "Severe Wind Gusts",
                AlertSeverity::High,
                date,
                format!("Severe wind gusts of {}km/h expected.", v),
            ));
        }

        if let Some(v) = at(&daily.precipitation_probability_max, i)
            .filter(|v| *v >= thresholds.high_precip_probability)
        {
            alerts.push(WeatherAlert::new(
                "High Precipitation Probability",
                AlertSeverity::Low,
                date,
                format!("{}% chance of precipitation.", v),
            ));
        }

        let severe = at(&daily.weather_code, i)
            .filter(|code| code.fract() == 0.0)
            .and_then(|code| severe_weather_description(code as i64));
        if let Some(description) = severe {
            alerts.push(WeatherAlert::new(
                "Severe Weather",
                AlertSeverity::High,
                date,
                format!("{} expected.", description),
            ));
        }
    }

    alerts
}

/// Alerts for display: the derived list, or a single "No Alerts" entry
pub fn alerts_or_none(daily: &DailyForecast, thresholds: &AlertThresholds) -> Vec<WeatherAlert> {
    let alerts = derive_alerts(daily, thresholds);
    if alerts.is_empty() {
        vec![WeatherAlert::none()]
    } else {
        alerts
    }
}
