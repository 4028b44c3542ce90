//! Place search and POI service

use reqwest::Request;
use serde_json::Value;
use shared::geo::distance_meters;
use shared::validation::{is_searchable_place_query, validate_coordinate, validate_poi_radius};
use shared::{find_poi_category, Coordinate, PlaceResult, PoiCategory, PoiResult, POI_CATEGORIES};

use crate::error::{AppError, AppResult};
use crate::external::overpass::OverpassElement;
use crate::external::{NominatimClient, OverpassClient};

const SEARCH_LIMIT: u32 = 5;
const POI_IMPORTANCE: f64 = 0.5;

/// Place service backed by Nominatim and Overpass
#[derive(Clone)]
pub struct PlacesService {
    nominatim: NominatimClient,
    overpass: OverpassClient,
}

impl PlacesService {
    pub fn new(nominatim: NominatimClient, overpass: OverpassClient) -> Self {
        Self {
            nominatim,
            overpass,
        }
    }

    /// Forward search; queries shorter than two characters return nothing
    pub async fn search(&self, query: &str) -> AppResult<Vec<PlaceResult>> {
        if !is_searchable_place_query(query) {
            return Ok(Vec::new());
        }
        self.nominatim
            .search(query.trim(), true, Some(SEARCH_LIMIT))
            .await
    }

    /// Reverse lookup with the structured `address` block
    pub fn reverse_request(&self, coordinate: Coordinate) -> AppResult<Request> {
        validate_coordinate(&coordinate)
            .map_err(|message| AppError::validation("coordinate", message))?;
        self.nominatim
            .reverse_request(coordinate.latitude, coordinate.longitude, true)
    }

    pub async fn reverse(&self, coordinate: Coordinate) -> AppResult<Value> {
        let request = self.reverse_request(coordinate)?;
        self.nominatim.send_reverse(request).await
    }

    pub async fn details(&self, place_id: u64) -> AppResult<Value> {
        self.nominatim.details(place_id).await
    }

    /// Category search around a point, nearest first.
    ///
    /// Unknown categories yield an empty list.
    pub async fn poi(
        &self,
        category: &str,
        radius: u32,
        center: Coordinate,
    ) -> AppResult<Vec<PoiResult>> {
        let Some(category) = find_poi_category(category) else {
            return Ok(Vec::new());
        };
        validate_poi_radius(radius).map_err(|message| AppError::validation("radius", message))?;
        validate_coordinate(&center)
            .map_err(|message| AppError::validation("coordinate", message))?;

        let elements = self
            .overpass
            .category_around(category.value, radius, center.latitude, center.longitude)
            .await?;

        tracing::debug!(category = category.id, count = elements.len(), "POI search");
        Ok(poi_results(category, center, elements))
    }

    pub fn categories(&self) -> &'static [PoiCategory] {
        &POI_CATEGORIES
    }
}

/// Map Overpass nodes to POI results sorted by distance from `center`
pub fn poi_results(
    category: &PoiCategory,
    center: Coordinate,
    elements: Vec<OverpassElement>,
) -> Vec<PoiResult> {
    let mut results: Vec<PoiResult> = elements
        .into_iter()
        .map(|element| {
            let display_name = element
                .tag("name")
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} (Unnamed)", category.name));
            let poi_type = ["amenity", "tourism", "leisure", "shop"]
                .iter()
                .find_map(|key| element.tag(key))
                .map(str::to_string);

            PoiResult {
                place_id: element.id,
                osm_id: element.id,
                lat: element.lat,
                lon: element.lon,
                display_name,
                category: category.name.to_string(),
                poi_type,
                importance: POI_IMPORTANCE,
                distance: distance_meters(center, Coordinate::new(element.lat, element.lon)),
            }
        })
        .collect();

    results.sort_by_key(|poi| poi.distance);
    results
}
