//! Nearby amenities tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::validation::validate_poi_radius;
use shared::NearbyAmenity;
use validator::{Validate, ValidationErrors};

use super::{
    coordinate_errors, coordinate_properties, finish, object_schema, parse_args, range_error, Tool,
    ToolError,
};
use crate::external::overpass::OverpassElement;
use crate::external::OverpassClient;

pub const NO_POI_MESSAGE: &str = "No points of interest found in the given radius.";

#[derive(Debug, Deserialize)]
pub struct PoiArgs {
    pub latitude: f64,
    pub longitude: f64,
    /// metres
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_radius() -> f64 {
    1000.0
}

impl PoiArgs {
    pub fn radius_meters(&self) -> u32 {
        self.radius.round() as u32
    }
}

impl Validate for PoiArgs {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = coordinate_errors(self.latitude, self.longitude);
        if self.radius < 0.0 {
            errors.add("radius", range_error("Radius must be between 1 and 50000 meters"));
        } else if let Err(message) = validate_poi_radius(self.radius_meters()) {
            errors.add("radius", range_error(message));
        }
        finish(errors)
    }
}

/// Reshape Overpass nodes for the model
pub fn amenities(elements: Vec<OverpassElement>) -> Value {
    if elements.is_empty() {
        return Value::String(NO_POI_MESSAGE.to_string());
    }
    let list: Vec<NearbyAmenity> = elements
        .into_iter()
        .map(|element| NearbyAmenity {
            name: element.tag("name").unwrap_or("Unknown").to_string(),
            amenity_type: element.tag("amenity").map(str::to_string),
            latitude: element.lat,
            longitude: element.lon,
        })
        .collect();
    json!(list)
}

/// Amenities around a point (getPOI)
#[derive(Clone)]
pub struct GetPoi {
    client: OverpassClient,
}

impl GetPoi {
    pub fn new(client: OverpassClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetPoi {
    fn name(&self) -> &'static str {
        "getPOI"
    }

    fn description(&self) -> &'static str {
        "Get points of interest near a specific location"
    }

    fn parameters(&self) -> Value {
        let mut properties = coordinate_properties();
        properties.insert(
            "radius".into(),
            json!({
                "type": "number",
                "default": 1000,
                "description": "Search radius in meters"
            }),
        );
        object_schema(properties, &["latitude", "longitude"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: PoiArgs = parse_args(args)?;
        let elements = self
            .client
            .amenities_around(args.radius_meters(), args.latitude, args.longitude)
            .await?;
        Ok(amenities(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn element(id: u64, tags: &[(&str, &str)]) -> OverpassElement {
        OverpassElement {
            id,
            lat: 51.5,
            lon: -0.12,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_default_radius() {
        let args: PoiArgs = parse_args(json!({"latitude": 1.0, "longitude": 2.0})).unwrap();
        assert_eq!(args.radius_meters(), 1000);
    }

    #[test]
    fn test_radius_bounds() {
        assert!(parse_args::<PoiArgs>(json!({"latitude": 1.0, "longitude": 2.0, "radius": 0}))
            .is_err());
        assert!(
            parse_args::<PoiArgs>(json!({"latitude": 1.0, "longitude": 2.0, "radius": 60000}))
                .is_err()
        );
    }

    #[test]
    fn test_empty_result_message() {
        assert_eq!(amenities(Vec::new()), json!(NO_POI_MESSAGE));
    }

    #[test]
    fn test_unnamed_amenity() {
        let value = amenities(vec![
            element(1, &[("amenity", "bench")]),
            element(2, &[("amenity", "cafe"), ("name", "Monmouth")]),
        ]);
        assert_eq!(value[0]["name"], "Unknown");
        assert_eq!(value[0]["type"], "bench");
        assert_eq!(value[1]["name"], "Monmouth");
        assert_eq!(value[1]["latitude"], 51.5);
    }
}
