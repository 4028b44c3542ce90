//! Air quality tool

use async_trait::async_trait;
use serde_json::Value;
use shared::codes::aqi_level_value;

use super::weather::LocationArgs;
use super::{
    annotate, coordinate_properties, object_schema, parse_args, timezone_property, Tool, ToolError,
};
use crate::error::AppError;
use crate::external::open_meteo::{location_params, QueryParams};
use crate::external::{OpenMeteoApi, OpenMeteoClient};

const CURRENT: &[&str] = &[
    "pm10",
    "pm2_5",
    "carbon_monoxide",
    "nitrogen_dioxide",
    "sulphur_dioxide",
    "ozone",
    "aerosol_optical_depth",
    "dust",
    "uv_index",
    "uv_index_clear_sky",
    "alder_pollen",
    "birch_pollen",
    "grass_pollen",
    "mugwort_pollen",
    "olive_pollen",
    "ragweed_pollen",
    "european_aqi",
    "european_aqi_pm2_5",
    "european_aqi_pm10",
    "european_aqi_no2",
    "european_aqi_o3",
    "european_aqi_so2",
];

const HOURLY: &[&str] = &[
    "pm10",
    "pm2_5",
    "carbon_monoxide",
    "nitrogen_dioxide",
    "sulphur_dioxide",
    "ozone",
    "aerosol_optical_depth",
    "dust",
    "uv_index",
    "uv_index_clear_sky",
    "european_aqi",
    "european_aqi_pm2_5",
    "european_aqi_pm10",
    "european_aqi_no2",
    "european_aqi_o3",
    "european_aqi_so2",
];

pub fn air_quality_params(args: &LocationArgs) -> QueryParams {
    let mut params = location_params(args.latitude, args.longitude);
    params.push(("timezone", args.timezone.clone()));
    params.push(("current", CURRENT.join(",")));
    params.push(("hourly", HOURLY.join(",")));
    params.push(("forecast_days", "3".to_string()));
    params
}

/// Pollutants and European AQI (getAirQuality)
#[derive(Clone)]
pub struct GetAirQuality {
    client: OpenMeteoClient,
}

impl GetAirQuality {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetAirQuality {
    fn name(&self) -> &'static str {
        "getAirQuality"
    }

    fn description(&self) -> &'static str {
        "Get air quality information for a specific location"
    }

    fn parameters(&self) -> Value {
        let mut properties = coordinate_properties();
        properties.insert("timezone".into(), timezone_property());
        object_schema(properties, &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: LocationArgs = parse_args(args)?;
        let mut data = self
            .client
            .fetch(OpenMeteoApi::AirQuality, &air_quality_params(&args))
            .await
            .map_err(|e| match e {
                AppError::Provider { reason, .. } => {
                    ToolError::Failed(format!("Air quality API error: {}", reason))
                }
                other => other.into(),
            })?;

        for block in ["current", "hourly"] {
            annotate(&mut data, block, "european_aqi", "aqi_level", aqi_level_value);
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_air_quality_params() {
        let args: LocationArgs =
            parse_args(json!({"latitude": 52.52, "longitude": 13.41, "timezone": "Europe/Berlin"}))
                .unwrap();
        let params = air_quality_params(&args);
        assert_eq!(params[0], ("latitude", "52.52".to_string()));
        assert_eq!(params[1], ("longitude", "13.41".to_string()));
        assert!(params.contains(&("forecast_days", "3".to_string())));
        assert!(params.contains(&("timezone", "Europe/Berlin".to_string())));
        let current = &params.iter().find(|(k, _)| *k == "current").unwrap().1;
        assert!(current.contains("ragweed_pollen"));
    }

    #[test]
    fn test_aqi_annotation() {
        let mut data = json!({
            "current": {"european_aqi": 2},
            "hourly": {"european_aqi": [1, 5, 7]}
        });
        for block in ["current", "hourly"] {
            annotate(&mut data, block, "european_aqi", "aqi_level", aqi_level_value);
        }
        assert_eq!(data["current"]["aqi_level"], "Fair");
        assert_eq!(data["hourly"]["aqi_level"], json!(["Good", "Very Poor", "Unknown"]));
    }
}
