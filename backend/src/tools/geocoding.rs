//! Forward and reverse geocoding tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{GeocodedLocation, PlaceResult};
use validator::{Validate, ValidationErrors};

use super::{
    coordinate_errors, coordinate_properties, finish, object_schema, parse_args, Tool, ToolError,
};
use crate::error::AppError;
use crate::external::NominatimClient;

#[derive(Debug, Deserialize)]
struct ReverseArgs {
    latitude: f64,
    longitude: f64,
}

impl Validate for ReverseArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        finish(coordinate_errors(self.latitude, self.longitude))
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

impl Validate for SearchArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

/// `{address, latitude, longitude}` from a reverse lookup body
pub fn reverse_location(body: &Value) -> GeocodedLocation {
    let field = |key: &str| body[key].as_str().unwrap_or_default().to_string();
    GeocodedLocation {
        address: field("display_name"),
        latitude: field("lat"),
        longitude: field("lon"),
    }
}

pub fn search_locations(results: Vec<PlaceResult>) -> Result<Vec<GeocodedLocation>, ToolError> {
    if results.is_empty() {
        return Err(ToolError::Failed(
            "No results found for the given query.".to_string(),
        ));
    }
    Ok(results
        .into_iter()
        .map(|place| GeocodedLocation {
            address: place.display_name,
            latitude: place.lat,
            longitude: place.lon,
        })
        .collect())
}

/// Address for a coordinate (getReverseGeocoding)
#[derive(Clone)]
pub struct GetReverseGeocoding {
    client: NominatimClient,
}

impl GetReverseGeocoding {
    pub fn new(client: NominatimClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetReverseGeocoding {
    fn name(&self) -> &'static str {
        "getReverseGeocoding"
    }

    fn description(&self) -> &'static str {
        "Get the address or location name for given coordinates"
    }

    fn parameters(&self) -> Value {
        object_schema(coordinate_properties(), &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: ReverseArgs = parse_args(args)?;
        let body = self
            .client
            .reverse(args.latitude, args.longitude, false)
            .await
            .map_err(|e| match e {
                AppError::Provider { reason, .. } => {
                    ToolError::Failed(format!("Reverse geocoding API error: {}", reason))
                }
                other => other.into(),
            })?;

        Ok(json!(reverse_location(&body)))
    }
}

/// Coordinates for an address (getGeocoding)
#[derive(Clone)]
pub struct GetGeocoding {
    client: NominatimClient,
}

impl GetGeocoding {
    pub fn new(client: NominatimClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetGeocoding {
    fn name(&self) -> &'static str {
        "getGeocoding"
    }

    fn description(&self) -> &'static str {
        "Get coordinates for a given address or location name"
    }

    fn parameters(&self) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "query".into(),
            json!({
                "type": "string",
                "description": "The address or location name to search for"
            }),
        );
        object_schema(properties, &["query"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: SearchArgs = parse_args(args)?;
        let results = self.client.search(&args.query, false, None).await?;
        Ok(json!(search_locations(results)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_location_fields() {
        let location = reverse_location(&json!({
            "display_name": "Eiffel Tower, Paris, France",
            "lat": "48.8582599",
            "lon": "2.2945006"
        }));
        assert_eq!(location.address, "Eiffel Tower, Paris, France");
        assert_eq!(location.latitude, "48.8582599");
    }

    #[test]
    fn test_empty_search_fails() {
        let err = search_locations(Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "No results found for the given query.");
    }

    #[test]
    fn test_search_maps_results() {
        let place: PlaceResult = serde_json::from_value(json!({
            "lat": "35.6762", "lon": "139.6503", "display_name": "Tokyo, Japan"
        }))
        .unwrap();
        let locations = search_locations(vec![place]).unwrap();
        assert_eq!(locations[0].longitude, "139.6503");
    }

    #[test]
    fn test_reverse_rejects_bad_latitude() {
        let err = parse_args::<ReverseArgs>(json!({"latitude": 120.0, "longitude": 0.0}))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
