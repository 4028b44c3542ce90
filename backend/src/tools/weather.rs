//! Forecast, history and alert tools backed by Open-Meteo

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::alerts::{alerts_or_none, AlertThresholds};
use shared::codes::weather_description_value;
use shared::DailyForecast;
use validator::{Validate, ValidationErrors};

use super::{
    annotate, coordinate_errors, coordinate_properties, default_timezone, finish, object_schema,
    parse_args, range_error, timezone_property, Tool, ToolError,
};
use crate::error::AppError;
use crate::external::open_meteo::{location_params, QueryParams};
use crate::external::{OpenMeteoApi, OpenMeteoClient};

const DETAILED_CURRENT: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "pressure_msl",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
];

const DETAILED_DAILY: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "sunrise",
    "sunset",
    "uv_index_max",
    "precipitation_sum",
    "rain_sum",
    "showers_sum",
    "snowfall_sum",
    "precipitation_hours",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
];

const DETAILED_HOURLY: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "precipitation_probability",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "snow_depth",
    "weather_code",
    "pressure_msl",
    "surface_pressure",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "visibility",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "uv_index",
    "is_day",
];

const HISTORICAL_DAILY: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "apparent_temperature_mean",
    "sunrise",
    "sunset",
    "daylight_duration",
    "sunshine_duration",
    "precipitation_sum",
    "rain_sum",
    "snowfall_sum",
    "precipitation_hours",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
    "shortwave_radiation_sum",
];

const ALERT_DAILY: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_sum",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
];

const ALERT_HOURLY: &[&str] = &[
    "temperature_2m",
    "precipitation_probability",
    "precipitation",
    "weather_code",
    "wind_speed_10m",
    "wind_gusts_10m",
];

#[derive(Debug, Deserialize)]
pub struct LocationArgs {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailedForecastArgs {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_days")]
    pub days: f64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalWeatherArgs {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_days() -> f64 {
    7.0
}

impl Validate for LocationArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        finish(coordinate_errors(self.latitude, self.longitude))
    }
}

impl Validate for DetailedForecastArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = coordinate_errors(self.latitude, self.longitude);
        if !(1.0..=16.0).contains(&self.days) || self.days.fract() != 0.0 {
            errors.add("days", range_error("days must be a whole number between 1 and 16"));
        }
        finish(errors)
    }
}

impl Validate for HistoricalWeatherArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        finish(coordinate_errors(self.latitude, self.longitude))
    }
}

impl Validate for CoordinateArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        finish(coordinate_errors(self.latitude, self.longitude))
    }
}

fn join(vars: &[&str]) -> String {
    vars.join(",")
}

/// Current conditions with the day's sunrise and sunset
pub fn weather_params(latitude: f64, longitude: f64) -> QueryParams {
    let mut params = location_params(latitude, longitude);
    params.push(("current", join(&["temperature_2m", "weather_code"])));
    params.push(("hourly", "temperature_2m".to_string()));
    params.push(("daily", join(&["sunrise", "sunset"])));
    params.push(("timezone", "auto".to_string()));
    params
}

pub fn detailed_forecast_params(args: &DetailedForecastArgs) -> QueryParams {
    let mut params = location_params(args.latitude, args.longitude);
    params.push(("timezone", args.timezone.clone()));
    params.push(("current", join(DETAILED_CURRENT)));
    params.push(("daily", join(DETAILED_DAILY)));
    params.push(("hourly", join(DETAILED_HOURLY)));
    params.push(("forecast_days", args.days.to_string()));
    params
}

pub fn historical_weather_params(args: &HistoricalWeatherArgs) -> QueryParams {
    let mut params = location_params(args.latitude, args.longitude);
    params.push(("start_date", args.start_date.clone()));
    params.push(("end_date", args.end_date.clone()));
    params.push(("timezone", args.timezone.clone()));
    params.push(("daily", join(HISTORICAL_DAILY)));
    params
}

pub fn weather_alert_params(args: &LocationArgs) -> QueryParams {
    let mut params = location_params(args.latitude, args.longitude);
    params.push(("timezone", args.timezone.clone()));
    params.push(("daily", join(ALERT_DAILY)));
    params.push(("hourly", join(ALERT_HOURLY)));
    params.push(("forecast_days", "3".to_string()));
    params
}

/// Current weather (getWeather)
#[derive(Clone)]
pub struct GetWeather {
    client: OpenMeteoClient,
}

impl GetWeather {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CoordinateArgs {
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl Tool for GetWeather {
    fn name(&self) -> &'static str {
        "getWeather"
    }

    fn description(&self) -> &'static str {
        "Get the current weather at a location"
    }

    fn parameters(&self) -> Value {
        object_schema(coordinate_properties(), &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: CoordinateArgs = parse_args(args)?;
        let mut data = self
            .client
            .fetch(OpenMeteoApi::Forecast, &weather_params(args.latitude, args.longitude))
            .await?;
        annotate(
            &mut data,
            "current",
            "weather_code",
            "weather_description",
            weather_description_value,
        );
        Ok(data)
    }
}

/// Multi-day forecast (getDetailedForecast)
#[derive(Clone)]
pub struct GetDetailedForecast {
    client: OpenMeteoClient,
}

impl GetDetailedForecast {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetDetailedForecast {
    fn name(&self) -> &'static str {
        "getDetailedForecast"
    }

    fn description(&self) -> &'static str {
        "Get a detailed multi-day weather forecast for a specific location"
    }

    fn parameters(&self) -> Value {
        let mut properties = coordinate_properties();
        properties.insert(
            "days".into(),
            json!({
                "type": "number",
                "minimum": 1,
                "maximum": 16,
                "default": 7,
                "description": "Number of forecast days (1-16)"
            }),
        );
        properties.insert("timezone".into(), timezone_property());
        object_schema(properties, &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: DetailedForecastArgs = parse_args(args)?;
        let mut data = match self
            .client
            .fetch(OpenMeteoApi::Forecast, &detailed_forecast_params(&args))
            .await
        {
            Ok(data) => data,
            Err(AppError::Provider { reason, .. }) => {
                return Ok(Value::String(format!("Weather API error: {}", reason)))
            }
            Err(e) => {
                return Ok(json!({
                    "error": format!("Error fetching detailed forecast data: {}", e)
                }))
            }
        };

        for block in ["current", "daily", "hourly"] {
            annotate(
                &mut data,
                block,
                "weather_code",
                "weather_description",
                weather_description_value,
            );
        }
        Ok(data)
    }
}

/// Archive data between two dates (getHistoricalWeather)
#[derive(Clone)]
pub struct GetHistoricalWeather {
    client: OpenMeteoClient,
}

impl GetHistoricalWeather {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetHistoricalWeather {
    fn name(&self) -> &'static str {
        "getHistoricalWeather"
    }

    fn description(&self) -> &'static str {
        "Get historical weather data for a specific location and time period"
    }

    fn parameters(&self) -> Value {
        let mut properties = coordinate_properties();
        properties.insert(
            "start_date".into(),
            json!({ "type": "string", "description": "Start date in YYYY-MM-DD format" }),
        );
        properties.insert(
            "end_date".into(),
            json!({ "type": "string", "description": "End date in YYYY-MM-DD format" }),
        );
        properties.insert("timezone".into(), timezone_property());
        object_schema(
            properties,
            &["latitude", "longitude", "start_date", "end_date"],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: HistoricalWeatherArgs = parse_args(args)?;
        let mut data = self
            .client
            .fetch(OpenMeteoApi::Archive, &historical_weather_params(&args))
            .await
            .map_err(|e| match e {
                AppError::Provider { reason, .. } => {
                    ToolError::Failed(format!("Historical weather API error: {}", reason))
                }
                other => other.into(),
            })?;

        annotate(
            &mut data,
            "daily",
            "weather_code",
            "weather_description",
            weather_description_value,
        );
        Ok(data)
    }
}

/// Threshold alerts over a three-day forecast (getWeatherAlerts)
#[derive(Clone)]
pub struct GetWeatherAlerts {
    client: OpenMeteoClient,
}

impl GetWeatherAlerts {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetWeatherAlerts {
    fn name(&self) -> &'static str {
        "getWeatherAlerts"
    }

    fn description(&self) -> &'static str {
        "Get weather alerts and warnings for a specific location"
    }

    fn parameters(&self) -> Value {
        let mut properties = coordinate_properties();
        properties.insert("timezone".into(), timezone_property());
        object_schema(properties, &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: LocationArgs = parse_args(args)?;
        let data = match self
            .client
            .fetch(OpenMeteoApi::Forecast, &weather_alert_params(&args))
            .await
        {
            Ok(data) => data,
            Err(AppError::Provider { reason, .. }) => {
                return Ok(Value::String(format!("Weather API error: {}", reason)))
            }
            Err(e) => {
                return Ok(json!({ "error": format!("Error generating weather alerts: {}", e) }))
            }
        };

        Ok(alert_report(&args, data))
    }
}

/// `{location, alerts, forecast_summary}` for a forecast response
pub fn alert_report(args: &LocationArgs, mut data: Value) -> Value {
    let daily_value = data.get_mut("daily").map(Value::take).unwrap_or(Value::Null);

    let alerts = match serde_json::from_value::<Option<DailyForecast>>(daily_value.clone()) {
        Ok(daily) => alerts_or_none(&daily.unwrap_or_default(), &AlertThresholds::default()),
        Err(e) => {
            return json!({ "error": format!("Error generating weather alerts: {}", e) });
        }
    };

    json!({
        "location": {
            "latitude": args.latitude,
            "longitude": args.longitude,
            "timezone": args.timezone,
        },
        "alerts": alerts,
        "forecast_summary": { "daily": daily_value },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(params: &QueryParams, key: &str) -> Option<String> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_detailed_forecast_defaults() {
        let args: DetailedForecastArgs =
            parse_args(json!({"latitude": 40.7128, "longitude": -74.006})).unwrap();
        let params = detailed_forecast_params(&args);
        assert_eq!(value_of(&params, "forecast_days").as_deref(), Some("7"));
        assert_eq!(value_of(&params, "timezone").as_deref(), Some("auto"));
        assert!(value_of(&params, "hourly").unwrap().contains("visibility"));
    }

    #[test]
    fn test_detailed_forecast_days_bounds() {
        let err = parse_args::<DetailedForecastArgs>(json!({
            "latitude": 0.0, "longitude": 0.0, "days": 17
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_detailed_forecast_days_whole_number() {
        let err = parse_args::<DetailedForecastArgs>(json!({
            "latitude": 0.0, "longitude": 0.0, "days": 7.5
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let args: DetailedForecastArgs =
            parse_args(json!({"latitude": 0.0, "longitude": 0.0, "days": 5.0})).unwrap();
        let params = detailed_forecast_params(&args);
        assert_eq!(value_of(&params, "forecast_days").as_deref(), Some("5"));
    }

    #[test]
    fn test_historical_params_carry_dates() {
        let args: HistoricalWeatherArgs = parse_args(json!({
            "latitude": 48.85, "longitude": 2.35,
            "start_date": "2024-01-01", "end_date": "2024-01-31"
        }))
        .unwrap();
        let params = historical_weather_params(&args);
        assert_eq!(value_of(&params, "start_date").as_deref(), Some("2024-01-01"));
        assert_eq!(value_of(&params, "end_date").as_deref(), Some("2024-01-31"));
        assert!(value_of(&params, "daily").unwrap().ends_with("shortwave_radiation_sum"));
    }

    #[test]
    fn test_alert_params_three_days() {
        let args: LocationArgs = parse_args(json!({"latitude": 1.0, "longitude": 2.0})).unwrap();
        let params = weather_alert_params(&args);
        assert_eq!(value_of(&params, "forecast_days").as_deref(), Some("3"));
    }

    #[test]
    fn test_alert_report_with_hot_day() {
        let args: LocationArgs =
            parse_args(json!({"latitude": 25.2, "longitude": 55.27, "timezone": "Asia/Dubai"}))
                .unwrap();
        let data = json!({
            "daily": {
                "time": ["2025-07-01", "2025-07-02"],
                "weather_code": [0, 95],
                "temperature_2m_max": [41.2, 30.0],
                "temperature_2m_min": [30.0, 28.0],
                "precipitation_sum": [0.0, 5.0],
                "precipitation_probability_max": [0, 40],
                "wind_speed_10m_max": [20.0, 25.0],
                "wind_gusts_10m_max": [30.0, 40.0]
            }
        });
        let report = alert_report(&args, data);
        assert_eq!(report["location"]["timezone"], "Asia/Dubai");
        let alerts = report["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0]["type"], "High Temperature");
        assert_eq!(alerts[1]["details"], "Thunderstorm expected.");
        assert_eq!(report["forecast_summary"]["daily"]["time"][0], "2025-07-01");
    }

    #[test]
    fn test_alert_report_without_daily_block() {
        let args: LocationArgs = parse_args(json!({"latitude": 1.0, "longitude": 2.0})).unwrap();
        let report = alert_report(&args, json!({}));
        assert_eq!(report["alerts"][0]["type"], "No Alerts");
        assert!(report["forecast_summary"]["daily"].is_null());
    }

    #[test]
    fn test_weather_params() {
        let params = weather_params(37.7749, -122.4194);
        assert_eq!(value_of(&params, "latitude").as_deref(), Some("37.7749"));
        assert_eq!(
            value_of(&params, "current").as_deref(),
            Some("temperature_2m,weather_code")
        );
        assert_eq!(value_of(&params, "daily").as_deref(), Some("sunrise,sunset"));
    }
}
