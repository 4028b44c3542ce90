//! Place and point-of-interest models

use serde::{Deserialize, Serialize};

/// Nominatim search/reverse result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: u64,
    #[serde(default)]
    pub licence: String,
    #[serde(default)]
    pub osm_type: String,
    #[serde(default)]
    pub osm_id: u64,
    #[serde(default)]
    pub boundingbox: Vec<String>,
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default, rename = "type")]
    pub place_type: String,
    #[serde(default)]
    pub importance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<PlaceAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaceAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Address or coordinates for a geocoding answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodedLocation {
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

/// A searchable POI category and its OpenStreetMap tag filter
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PoiCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub value: &'static str,
    pub char: &'static str,
}

pub const POI_CATEGORIES: [PoiCategory; 10] = [
    PoiCategory { id: "restaurant", name: "Restaurants", value: "amenity=restaurant", char: "🍴" },
    PoiCategory { id: "cafe", name: "Cafes", value: "amenity=cafe", char: "☕" },
    PoiCategory { id: "hotel", name: "Hotels", value: "tourism=hotel", char: "🏨" },
    PoiCategory { id: "attraction", name: "Attractions", value: "tourism=attraction", char: "🎡" },
    PoiCategory { id: "park", name: "Parks", value: "leisure=park", char: "🌳" },
    PoiCategory { id: "museum", name: "Museums", value: "tourism=museum", char: "🏛️" },
    PoiCategory { id: "hospital", name: "Hospitals", value: "amenity=hospital", char: "🏥" },
    PoiCategory { id: "pharmacy", name: "Pharmacies", value: "amenity=pharmacy", char: "💊" },
    PoiCategory { id: "fuel", name: "Gas Stations", value: "amenity=fuel", char: "⛽" },
    PoiCategory { id: "supermarket", name: "Supermarkets", value: "shop=supermarket", char: "🛒" },
];

pub fn find_poi_category(id: &str) -> Option<&'static PoiCategory> {
    POI_CATEGORIES.iter().find(|category| category.id == id)
}

/// POI returned from a category search around a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoiResult {
    pub place_id: u64,
    pub osm_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub poi_type: Option<String>,
    pub importance: f64,
    /// Metres from the search centre
    pub distance: u64,
}

/// Amenity near a point, as reported to the assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyAmenity {
    pub name: String,
    #[serde(rename = "type")]
    pub amenity_type: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_category() {
        assert_eq!(find_poi_category("cafe").unwrap().value, "amenity=cafe");
        assert!(find_poi_category("casino").is_none());
    }

    #[test]
    fn test_category_ids_are_unique() {
        for (i, a) in POI_CATEGORIES.iter().enumerate() {
            for b in &POI_CATEGORIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_place_result_from_nominatim() {
        let place: PlaceResult = serde_json::from_value(json!({
            "place_id": 123,
            "lat": "51.5073219",
            "lon": "-0.1276474",
            "display_name": "London, Greater London, England, United Kingdom",
            "class": "place",
            "type": "city",
            "importance": 0.85,
            "address": {"city": "London", "country_code": "gb"}
        }))
        .unwrap();
        assert_eq!(place.place_type, "city");
        assert_eq!(place.address.unwrap().city.as_deref(), Some("London"));
    }
}
