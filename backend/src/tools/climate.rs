//! Climate normals tool

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::codes::{seasons, MONTH_NAMES};

use super::weather::LocationArgs;
use super::{
    coordinate_properties, object_schema, parse_args, timezone_property, Tool, ToolError,
};
use crate::error::AppError;
use crate::external::open_meteo::{location_params, QueryParams};
use crate::external::{OpenMeteoApi, OpenMeteoClient};

const MONTHLY: &[&str] = &[
    "temperature_2m_mean",
    "temperature_2m_min",
    "temperature_2m_max",
    "precipitation_sum",
    "rain_sum",
    "snowfall_sum",
    "precipitation_hours",
    "wind_speed_10m_mean",
];

/// 1991-2020 reference period
pub fn climate_params(args: &LocationArgs) -> QueryParams {
    let mut params = location_params(args.latitude, args.longitude);
    params.push(("timezone", args.timezone.clone()));
    params.push(("monthly", MONTHLY.join(",")));
    params.push(("models", "era5_reanalysis".to_string()));
    params.push(("start_date", "1991-01-01".to_string()));
    params.push(("end_date", "2020-12-31".to_string()));
    params
}

/// Add month names and hemisphere-aware seasons to the monthly block
pub fn add_seasons(data: &mut Value, latitude: f64) {
    if let Some(monthly) = data.get_mut("monthly").and_then(Value::as_object_mut) {
        monthly.insert("month_names".into(), json!(MONTH_NAMES));
        monthly.insert("seasons".into(), json!(seasons(latitude >= 0.0)));
    }
}

/// Monthly climate averages and seasons (getClimateData)
#[derive(Clone)]
pub struct GetClimateData {
    client: OpenMeteoClient,
}

impl GetClimateData {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetClimateData {
    fn name(&self) -> &'static str {
        "getClimateData"
    }

    fn description(&self) -> &'static str {
        "Get climate data and seasonal patterns for a specific location"
    }

    fn parameters(&self) -> Value {
        let mut properties = coordinate_properties();
        properties.insert("timezone".into(), timezone_property());
        object_schema(properties, &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: LocationArgs = parse_args(args)?;
        let mut data = match self
            .client
            .fetch(OpenMeteoApi::Climate, &climate_params(&args))
            .await
        {
            Ok(data) => data,
            Err(AppError::Provider { reason, .. }) => {
                return Ok(Value::String(format!("Climate API error: {}", reason)))
            }
            Err(e) => return Ok(json!({ "error": format!("Error fetching climate data: {}", e) })),
        };

        add_seasons(&mut data, args.latitude);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_climate_params_reference_period() {
        let args: LocationArgs =
            parse_args(json!({"latitude": -33.87, "longitude": 151.21})).unwrap();
        let params = climate_params(&args);
        assert!(params.contains(&("models", "era5_reanalysis".to_string())));
        assert!(params.contains(&("start_date", "1991-01-01".to_string())));
        assert!(params.contains(&("end_date", "2020-12-31".to_string())));
    }

    #[test]
    fn test_southern_hemisphere_seasons() {
        let mut data = json!({"monthly": {"temperature_2m_mean": []}});
        add_seasons(&mut data, -33.87);
        assert_eq!(data["monthly"]["month_names"][0], "January");
        assert_eq!(data["monthly"]["seasons"][0], "Summer");
        assert_eq!(data["monthly"]["seasons"][6], "Winter");
    }

    #[test]
    fn test_equator_is_northern() {
        let mut data = json!({"monthly": {}});
        add_seasons(&mut data, 0.0);
        assert_eq!(data["monthly"]["seasons"][3], "Spring");
    }

    #[test]
    fn test_missing_monthly_block_untouched() {
        let mut data = json!({"latitude": 1.0});
        add_seasons(&mut data, 1.0);
        assert!(data.get("monthly").is_none());
    }
}
