//! Overpass API client for OpenStreetMap points of interest

use std::collections::HashMap;

use reqwest::{Client, Request};
use serde::Deserialize;

use crate::config::OverpassConfig;
use crate::error::{AppError, AppResult};

const SERVICE: &str = "Overpass";

/// OSM node returned by an `out` statement
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OverpassElement {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassElement {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Query selecting every node with an `amenity` tag inside the radius
pub fn amenity_query(radius: u32, latitude: f64, longitude: f64) -> String {
    format!(
        "[out:json];node(around:{},{},{})[amenity];out;",
        radius, latitude, longitude
    )
}

/// Query selecting nodes matching one tag filter (e.g. `amenity=cafe`)
pub fn category_query(filter: &str, radius: u32, latitude: f64, longitude: f64) -> String {
    format!(
        "[out:json];\nnode[{}](around:{},{},{});\nout body;",
        filter, radius, latitude, longitude
    )
}

/// Overpass interpreter client
#[derive(Clone)]
pub struct OverpassClient {
    client: Client,
    base_url: String,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &OverpassConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// GET with the query in the `data` parameter
    pub fn amenities_request(
        &self,
        radius: u32,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Request> {
        self.client
            .get(&self.base_url)
            .query(&[("data", amenity_query(radius, latitude, longitude))])
            .build()
            .map_err(|e| AppError::Internal(format!("Invalid Overpass request: {}", e)))
    }

    /// POST with the query as the body
    pub fn category_request(
        &self,
        filter: &str,
        radius: u32,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Request> {
        self.client
            .post(&self.base_url)
            .body(category_query(filter, radius, latitude, longitude))
            .build()
            .map_err(|e| AppError::Internal(format!("Invalid Overpass request: {}", e)))
    }

    pub async fn amenities_around(
        &self,
        radius: u32,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Vec<OverpassElement>> {
        let request = self.amenities_request(radius, latitude, longitude)?;
        self.execute(request).await
    }

    pub async fn category_around(
        &self,
        filter: &str,
        radius: u32,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Vec<OverpassElement>> {
        let request = self.category_request(filter, radius, latitude, longitude)?;
        self.execute(request).await
    }

    async fn execute(&self, request: Request) -> AppResult<Vec<OverpassElement>> {
        tracing::debug!(url = %request.url(), "Overpass request");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::ExternalService(format!("Overpass request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let data: OverpassResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse Overpass response: {}", e)))?;
        Ok(data.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_amenity_query_text() {
        assert_eq!(
            amenity_query(1000, 51.5074, -0.1278),
            "[out:json];node(around:1000,51.5074,-0.1278)[amenity];out;"
        );
    }

    #[test]
    fn test_category_query_text() {
        let q = category_query("amenity=cafe", 500, 1.5, 2.5);
        assert!(q.contains("node[amenity=cafe](around:500,1.5,2.5);"));
        assert!(q.ends_with("out body;"));
    }

    #[test]
    fn test_amenities_request_is_get_with_data() {
        let client = OverpassClient::new(&Config::defaults().unwrap().overpass);
        let request = client.amenities_request(250, 10.0, 20.0).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        let data: Vec<String> = request
            .url()
            .query_pairs()
            .filter(|(k, _)| k == "data")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(data, vec!["[out:json];node(around:250,10,20)[amenity];out;"]);
    }

    #[test]
    fn test_element_without_tags() {
        let el: OverpassElement =
            serde_json::from_str(r#"{"type":"node","id":7,"lat":1.0,"lon":2.0}"#).unwrap();
        assert!(el.tag("name").is_none());
    }
}
