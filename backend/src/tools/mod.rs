//! Tool adapters exposed to the language model
//!
//! Each tool builds one upstream request, reshapes the JSON and returns it.
//! A tool either returns a value (which may itself be an error payload the
//! model can narrate) or fails with [`ToolError`], which the orchestrator
//! reports back to the model as a failed call.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::validation::{validate_latitude, validate_longitude};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::external::{NominatimClient, OpenMeteoClient, OverpassClient};
use crate::services::llm::ToolSpec;

pub mod air_quality;
pub mod climate;
pub mod geocoding;
pub mod poi;
pub mod weather;

pub use air_quality::GetAirQuality;
pub use climate::GetClimateData;
pub use geocoding::{GetGeocoding, GetReverseGeocoding};
pub use poi::GetPoi;
pub use weather::{GetDetailedForecast, GetHistoricalWeather, GetWeather, GetWeatherAlerts};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    Failed(String),
}

impl From<AppError> for ToolError {
    fn from(e: AppError) -> Self {
        ToolError::Failed(e.to_string())
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the arguments object
    fn parameters(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<Value, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Deserialize and validate tool arguments
pub fn parse_args<T>(args: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
    parsed
        .validate()
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
    Ok(parsed)
}

pub(crate) fn range_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("range");
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Range errors for an out-of-bounds coordinate, empty when valid
pub(crate) fn coordinate_errors(latitude: f64, longitude: f64) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Err(message) = validate_latitude(latitude) {
        errors.add("latitude", range_error(message));
    }
    if let Err(message) = validate_longitude(longitude) {
        errors.add("longitude", range_error(message));
    }
    errors
}

pub(crate) fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Replace `block.source` with its description in `block.target`.
///
/// Arrays are described element-wise; a missing block or source is left alone.
pub(crate) fn annotate(
    data: &mut Value,
    block: &str,
    source: &str,
    target: &str,
    describe: fn(&Value) -> &'static str,
) {
    let Some(block) = data.get_mut(block).and_then(Value::as_object_mut) else {
        return;
    };
    let described = match block.get(source) {
        None | Some(Value::Null) => return,
        Some(Value::Array(values)) => {
            Value::Array(values.iter().map(|v| Value::from(describe(v))).collect())
        }
        Some(value) => Value::from(describe(value)),
    };
    block.insert(target.to_string(), described);
}

/// `latitude` and `longitude` properties shared by most tools
pub(crate) fn coordinate_properties() -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "latitude".into(),
        json!({ "type": "number", "description": "The latitude of the location" }),
    );
    properties.insert(
        "longitude".into(),
        json!({ "type": "number", "description": "The longitude of the location" }),
    );
    properties
}

pub(crate) fn timezone_property() -> Value {
    json!({
        "type": "string",
        "description": "The timezone of the location (optional)"
    })
}

pub(crate) fn object_schema(
    properties: serde_json::Map<String, Value>,
    required: &[&str],
) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

pub(crate) fn default_timezone() -> String {
    "auto".to_string()
}

/// Registered tool set
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The nine weather and geospatial tools
    pub fn standard(
        open_meteo: OpenMeteoClient,
        nominatim: NominatimClient,
        overpass: OverpassClient,
    ) -> Self {
        Self::new()
            .with(GetWeather::new(open_meteo.clone()))
            .with(GetDetailedForecast::new(open_meteo.clone()))
            .with(GetHistoricalWeather::new(open_meteo.clone()))
            .with(GetAirQuality::new(open_meteo.clone()))
            .with(GetClimateData::new(open_meteo.clone()))
            .with(GetWeatherAlerts::new(open_meteo))
            .with(GetReverseGeocoding::new(nominatim.clone()))
            .with(GetGeocoding::new(nominatim))
            .with(GetPoi::new(overpass))
    }

    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let result = tool.execute(args).await;
        if let Err(e) = &result {
            tracing::error!(tool = name, error = %e, "Tool execution failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn registry() -> ToolRegistry {
        let config = Config::defaults().unwrap();
        ToolRegistry::standard(
            OpenMeteoClient::new(config.open_meteo),
            NominatimClient::new(&config.geocoding),
            OverpassClient::new(&config.overpass),
        )
    }

    #[test]
    fn test_standard_tool_names() {
        assert_eq!(
            registry().names(),
            vec![
                "getWeather",
                "getDetailedForecast",
                "getHistoricalWeather",
                "getAirQuality",
                "getClimateData",
                "getWeatherAlerts",
                "getReverseGeocoding",
                "getGeocoding",
                "getPOI",
            ]
        );
    }

    #[test]
    fn test_specs_are_object_schemas() {
        for spec in registry().specs() {
            assert_eq!(spec.parameters["type"], "object", "{}", spec.name);
            assert!(!spec.description.is_empty());
        }
    }

    #[test]
    fn test_annotate_scalar_and_series() {
        let mut data = json!({
            "current": {"weather_code": 3},
            "daily": {"weather_code": [0, 999, null]}
        });
        for block in ["current", "daily", "hourly"] {
            annotate(
                &mut data,
                block,
                "weather_code",
                "weather_description",
                shared::codes::weather_description_value,
            );
        }
        assert_eq!(data["current"]["weather_description"], "Overcast");
        assert_eq!(
            data["daily"]["weather_description"],
            json!(["Clear sky", "Unknown", "Unknown"])
        );
        assert!(data.get("hourly").is_none());
    }

    #[test]
    fn test_coordinate_errors() {
        assert!(finish(coordinate_errors(45.0, 90.0)).is_ok());
        let errors = coordinate_errors(91.0, -181.0);
        assert_eq!(errors.errors().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = registry().execute("getTides", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "getTides"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_fail_before_fetch() {
        let err = registry()
            .execute("getDetailedForecast", json!({"latitude": "north"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
